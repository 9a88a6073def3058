use flow_core::rating::rating_curve_for_request;
use flow_core::{ChannelSource, FlowEstimator, FlowRequest, FlowResult, RatingOptions, RatingPoint, SolverConfig, WseRange};
use wasm_bindgen::prelude::*;

/// Parse a request JSON; the browser has no filesystem, so `file` sources
/// are rejected here rather than failing later with an I/O error.
fn parse_request(request_json: &str) -> Result<FlowRequest, String> {
    let request = FlowRequest::from_json(request_json).map_err(|e| e.to_string())?;
    if let ChannelSource::File { path } = &request.source {
        return Err(format!(
            "file source '{}' is not available in the browser; send the profile points instead",
            path.display()
        ));
    }
    Ok(request)
}

fn estimator_for(request: &FlowRequest) -> FlowEstimator {
    FlowEstimator::new(SolverConfig::for_units(request.units))
}

fn estimate_inner(request_json: &str) -> Result<FlowResult, String> {
    let request = parse_request(request_json)?;
    estimator_for(&request).estimate(&request).map_err(|e| e.to_string())
}

fn rating_inner(request_json: &str, step: f64) -> Result<Vec<RatingPoint>, String> {
    let request = parse_request(request_json)?;
    rating_curve_for_request(&estimator_for(&request), &request, &RatingOptions { step }).map_err(|e| e.to_string())
}

fn wse_range_inner(request_json: &str) -> Result<WseRange, String> {
    let request = parse_request(request_json)?;
    let estimator = estimator_for(&request);
    let profile = estimator.resolve_profile(&request.source).map_err(|e| e.to_string())?;
    estimator.wse_range(&request.source, &profile).map_err(|e| e.to_string())
}

fn to_js<T: serde::Serialize>(value: Result<T, String>) -> Result<JsValue, JsValue> {
    let value = value.map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&value).map_err(|e| JsValue::from_str(&format!("Serialization failed: {e}")))
}

/// Solve one `FlowRequest` (JSON) and return the `FlowResult` object.
#[wasm_bindgen]
pub fn estimate(request_json: &str) -> Result<JsValue, JsValue> {
    to_js(estimate_inner(request_json))
}

/// Rating table over the channel's admissible WSE range at `step`.
/// The request's own `water_surface_elevation` is ignored.
#[wasm_bindgen]
pub fn rating_curve(request_json: &str, step: f64) -> Result<JsValue, JsValue> {
    to_js(rating_inner(request_json, step))
}

/// `{min, max}` water levels the requested channel can hold.
#[wasm_bindgen]
pub fn wse_range(request_json: &str) -> Result<JsValue, JsValue> {
    to_js(wse_range_inner(request_json))
}
