use gflows_content::StaticAssets;

/// Starter files for `gflows init`, addressed by `/<engine>/<path>`.
pub static STARTER_ASSETS: StaticAssets = StaticAssets::new(&[
  (
    "/jsonnet/config.yml",
    include_str!("../assets/jsonnet/config.yml"),
  ),
  (
    "/jsonnet/workflows/common/steps.libsonnet",
    include_str!("../assets/jsonnet/workflows/common/steps.libsonnet"),
  ),
  (
    "/jsonnet/workflows/common/workflows.libsonnet",
    include_str!("../assets/jsonnet/workflows/common/workflows.libsonnet"),
  ),
  (
    "/jsonnet/workflows/gflows.jsonnet",
    include_str!("../assets/jsonnet/workflows/gflows.jsonnet"),
  ),
  ("/ytt/config.yml", include_str!("../assets/ytt/config.yml")),
  (
    "/ytt/workflows/common/steps.lib.yml",
    include_str!("../assets/ytt/workflows/common/steps.lib.yml"),
  ),
  (
    "/ytt/workflows/common/workflows.lib.yml",
    include_str!("../assets/ytt/workflows/common/workflows.lib.yml"),
  ),
  (
    "/ytt/workflows/common/values.yml",
    include_str!("../assets/ytt/workflows/common/values.yml"),
  ),
  (
    "/ytt/workflows/gflows/gflows.yml",
    include_str!("../assets/ytt/workflows/gflows/gflows.yml"),
  ),
]);
