use crate::schema::ParleyConfig;

use super::helpers::{validate_not_blank, validate_range, validate_range_f64};

pub(super) fn validate_model(errors: &mut Vec<String>, config: &ParleyConfig) {
    let model = &config.model;

    validate_not_blank(errors, "model.name", &model.name);
    validate_not_blank(errors, "model.api_key_env", &model.api_key_env);

    if !(model.base_url.starts_with("https://") || model.base_url.starts_with("http://")) {
        errors.push(format!(
            "model.base_url = {:?} must be an http(s) URL",
            model.base_url
        ));
    }

    if let Some(temperature) = model.temperature {
        validate_range_f64(errors, "model.temperature", temperature, 0.0, 2.0);
    }
    if let Some(max_tokens) = model.max_tokens {
        validate_range(errors, "model.max_tokens", max_tokens, 1, 65_536);
    }
    validate_range(
        errors,
        "model.connect_timeout_secs",
        model.connect_timeout_secs,
        1,
        300,
    );
    validate_range(
        errors,
        "model.request_timeout_secs",
        model.request_timeout_secs,
        1,
        3600,
    );
}
