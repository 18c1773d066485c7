use crate::theme::{LabelFont, Theme};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveConfig {
    /// Footprint of one label along the strip.
    pub width: f32,
    /// Gap between labels inside a group.
    pub margin: f32,
    /// Extra gap added whenever a group is pushed away from its neighbour.
    pub group_margin: f32,
    /// Grouping distance; `width + 2 * margin` when unset.
    pub threshold: Option<f32>,
    pub max_iteration: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            margin: 5.0,
            group_margin: 0.0,
            threshold: None,
            max_iteration: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackConfig {
    /// Vertical distance under which two labels collide.
    pub label_height: f32,
    /// Added to the measured text width of each label.
    pub x_offset: f32,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            label_height: 13.0,
            x_offset: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkConfig {
    /// Length of the tick drawn out of the label edge.
    pub side_length: f32,
    /// Gap between the label edge and the tick.
    pub shift: f32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            side_length: 6.0,
            shift: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub resolve: ResolveConfig,
    pub stack: StackConfig,
    pub link: LinkConfig,
    /// Skip font lookup and measure with the built-in width table.
    pub fast_text_metrics: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveConfigFile {
    width: Option<f32>,
    margin: Option<f32>,
    group_margin: Option<f32>,
    threshold: Option<f32>,
    max_iteration: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StackConfigFile {
    label_height: Option<f32>,
    x_offset: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkConfigFile {
    side_length: Option<f32>,
    shift: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    /// CSS font shorthand, e.g. `bold 11px Arial`.
    font: Option<String>,
    label_line_height: Option<f32>,
    value_decimals: Option<usize>,
    fast_text_metrics: Option<bool>,
    resolve: Option<ResolveConfigFile>,
    stack: Option<StackConfigFile>,
    link: Option<LinkConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    log::debug!("loaded layout config from {}", path.display());
    Ok(config)
}

/// Overlays a JSON5 config document onto the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "compact" => config.theme = Theme::compact(),
            "standard" | "default" => config.theme = Theme::standard(),
            other => log::warn!("unknown theme `{other}`, keeping the standard theme"),
        }
    }
    if let Some(font) = parsed.font.as_deref() {
        config.theme.label_font = LabelFont::parse_css(font)?;
    }
    if let Some(v) = parsed.label_line_height {
        config.theme.label_line_height = v;
    }
    if let Some(v) = parsed.value_decimals {
        config.theme.value_decimals = v;
    }
    if let Some(v) = parsed.fast_text_metrics {
        config.layout.fast_text_metrics = v;
    }

    if let Some(resolve) = parsed.resolve {
        let target = &mut config.layout.resolve;
        if let Some(v) = resolve.width {
            target.width = v;
        }
        if let Some(v) = resolve.margin {
            target.margin = v;
        }
        if let Some(v) = resolve.group_margin {
            target.group_margin = v;
        }
        if resolve.threshold.is_some() {
            target.threshold = resolve.threshold;
        }
        if let Some(v) = resolve.max_iteration {
            target.max_iteration = v;
        }
    }
    if let Some(stack) = parsed.stack {
        if let Some(v) = stack.label_height {
            config.layout.stack.label_height = v;
        }
        if let Some(v) = stack.x_offset {
            config.layout.stack.x_offset = v;
        }
    }
    if let Some(link) = parsed.link {
        if let Some(v) = link.side_length {
            config.layout.link.side_length = v;
        }
        if let Some(v) = link.shift {
            config.layout.link.shift = v;
        }
    }

    Ok(config)
}
