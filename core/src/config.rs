use crate::{
    colormap::{ColorScale, Colormap},
    error::{ChartError, ChartResult},
    figure::Resolution,
    generator::Variant,
    heatmap::{HeatmapOptions, TickRotation},
    types::Seed,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SEED: Seed = 42;
pub const DEFAULT_OUTPUT: &str = "chart.png";

/// Everything one pipeline run needs. Fields missing from a config file
/// fall back to the classic preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub seed: Seed,
    pub customers: usize,
    pub variant: Variant,
    pub output: PathBuf,
    pub resolution: Resolution,
    pub heatmap: HeatmapOptions,
    /// Print a confirmation line after export.
    pub verbose: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl ChartConfig {
    /// 200 customers, independent metrics, RdYlGn, 100 dpi × 5.12 in.
    pub fn classic() -> Self {
        Self {
            seed: DEFAULT_SEED,
            customers: Variant::Classic.default_customers(),
            variant: Variant::Classic,
            output: PathBuf::from(DEFAULT_OUTPUT),
            resolution: Resolution::standard(),
            heatmap: HeatmapOptions::default(),
            verbose: false,
        }
    }

    /// 1000 customers on a shared engagement factor, lower triangle only,
    /// fixed [-1, 1] scale, 64 dpi × 8 in.
    pub fn extended() -> Self {
        Self {
            seed: DEFAULT_SEED,
            customers: Variant::Extended.default_customers(),
            variant: Variant::Extended,
            output: PathBuf::from(DEFAULT_OUTPUT),
            resolution: Resolution::wide_dpi(),
            heatmap: HeatmapOptions {
                colormap: Colormap::Coolwarm,
                scale: ColorScale::symmetric_unit(),
                mask_upper: true,
                tick_rotation: TickRotation::Vertical,
                colorbar_label: Some("Correlation Coefficient".into()),
                ..HeatmapOptions::default()
            },
            verbose: true,
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Extended => Self::extended(),
        }
    }

    /// Config with small, fast defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            customers: 50,
            output: std::env::temp_dir().join("engagement-test-chart.png"),
            ..Self::classic()
        }
    }

    /// Load from a JSON file. In tests, use ChartConfig::default_test().
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: ChartConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.customers == 0 {
            return Err(ChartError::InvalidConfig("customers must be > 0".into()));
        }
        let shrink = self.heatmap.colorbar_shrink;
        if !(shrink > 0.0 && shrink <= 1.0) {
            return Err(ChartError::InvalidConfig(format!(
                "colorbar_shrink must be in (0, 1], got {shrink}"
            )));
        }
        if let ColorScale::Fixed { min, max, .. } = self.heatmap.scale {
            if !(min < max) {
                return Err(ChartError::InvalidConfig(format!(
                    "color scale min ({min}) must be below max ({max})"
                )));
            }
        }
        self.resolution.pixel_dims()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        ChartConfig::classic().validate().unwrap();
        ChartConfig::extended().validate().unwrap();
        ChartConfig::default_test().validate().unwrap();
    }

    #[test]
    fn partial_json_falls_back_to_classic() {
        let config: ChartConfig =
            serde_json::from_str(r#"{ "seed": 7, "heatmap": { "mask_upper": true } }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.customers, 200);
        assert!(config.heatmap.mask_upper);
        assert_eq!(config.heatmap.colormap, Colormap::RdYlGn);
        assert_eq!(config.resolution, Resolution::standard());
    }

    #[test]
    fn variant_and_scale_parse_from_json() {
        let config: ChartConfig = serde_json::from_str(
            r#"{
                "variant": "extended",
                "heatmap": {
                    "colormap": "coolwarm",
                    "scale": { "mode": "fixed", "min": -1.0, "max": 1.0, "center": 0.0 }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.variant, Variant::Extended);
        assert_eq!(config.heatmap.colormap, Colormap::Coolwarm);
        assert_eq!(config.heatmap.scale, ColorScale::symmetric_unit());
    }

    #[test]
    fn rejects_zero_customers_and_bad_resolution() {
        let mut config = ChartConfig::classic();
        config.customers = 0;
        assert!(config.validate().is_err());

        let mut config = ChartConfig::classic();
        config.resolution.width_in = 5.125;
        assert!(matches!(
            config.validate(),
            Err(ChartError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ChartConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }
}
