use nmr_label_layout::{
    Config, FallbackMeasurer, FontMeasurer, LabelFont, LayoutRequest, Theme, compute_layout,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelLayoutOptions {
    theme: Option<String>,
    /// CSS font shorthand, e.g. `"bold 12px Arial"`.
    font: Option<String>,
    value_decimals: Option<usize>,
    fast_text: Option<bool>,
}

fn build_config(options: LabelLayoutOptions) -> Result<Config, String> {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("compact") {
        config.theme = Theme::compact();
    }
    if let Some(font) = options.font {
        config.theme.label_font = LabelFont::parse_css(&font).map_err(|error| error.to_string())?;
    }
    if let Some(decimals) = options.value_decimals {
        config.theme.value_decimals = decimals;
    }
    config.layout.fast_text_metrics = options.fast_text.unwrap_or(false);
    Ok(config)
}

fn layout_to_json(request_json: &str, options: LabelLayoutOptions) -> Result<String, String> {
    let config = build_config(options)?;
    let request = LayoutRequest::from_json(request_json).map_err(|error| error.to_string())?;
    let result = if config.layout.fast_text_metrics {
        compute_layout(&request, &config, &mut FallbackMeasurer)
    } else {
        compute_layout(&request, &config, &mut FontMeasurer::new())
    };
    serde_json::to_string(&result).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn compute_label_layout(
    request_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<LabelLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        LabelLayoutOptions::default()
    };

    layout_to_json(request_json, options).map_err(|error| JsValue::from_str(&error))
}
