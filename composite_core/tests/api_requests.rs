//! JSON wire contract of the request/response layer.

use composite_core::api::{handle_batch_json, handle_json};
use composite_core::validation::ValidationLimits;
use serde_json::{json, Value};

fn answer(request: Value) -> Value {
    let response = handle_json(&request.to_string(), &ValidationLimits::default());
    serde_json::to_value(response).unwrap()
}

fn lamina_request() -> Value {
    json!({
        "type": "lamina-engineering-constants",
        "E1": 150000, "E2": 10000, "G12": 5000, "nu12": 0.3,
        "layup_angle": 45
    })
}

fn plate_request() -> Value {
    json!({
        "type": "laminate-plate-properties",
        "E1": 150000, "E2": 10000, "G12": 5000, "nu12": 0.3,
        "layup_sequence": "[45/90/-45]s", "layer_thickness": 0.125
    })
}

fn laminate_3d_request() -> Value {
    json!({
        "type": "laminate-3d-properties",
        "E1": 150000, "E2": 10000, "G12": 5000, "nu12": 0.3, "nu23": 0.25,
        "layup_sequence": "[30/45]2s", "layer_thickness": 0.125
    })
}

fn udfrc_request() -> Value {
    json!({
        "type": "udfrc-properties",
        "fiber_E1": 150000, "fiber_E2": 10000, "fiber_G12": 5000,
        "fiber_nu12": 0.3, "fiber_nu23": 0.25,
        "matrix_E1": 2500, "matrix_nu": 0.35,
        "fiber_volume_fraction": 0.6
    })
}

fn has_keys(value: &Value, keys: &[&str]) {
    for key in keys {
        assert!(value.get(key).is_some(), "missing key {key} in {value}");
    }
}

fn is_matrix(value: &Value, n: usize) -> bool {
    value
        .as_array()
        .map(|rows| rows.len() == n && rows.iter().all(|r| r.as_array().map(|c| c.len()) == Some(n)))
        .unwrap_or(false)
}

#[test]
fn test_lamina_response_shape() {
    let response = answer(lamina_request());
    assert_eq!(response["status"], 200);
    has_keys(&response, &["request_id", "computed_at", "calc_type", "result"]);

    let result = &response["result"];
    has_keys(result, &["E_1", "E_2", "G_12", "nu_12", "eta_1_12", "eta_2_12", "Q", "S"]);
    assert!(is_matrix(&result["Q"], 3));
    assert!(is_matrix(&result["S"], 3));
}

#[test]
fn test_plate_response_shape() {
    let response = answer(plate_request());
    assert_eq!(response["status"], 200);

    let result = &response["result"];
    has_keys(result, &["A", "B", "D", "in_plane_properties", "flexural_properties"]);
    for block in ["in_plane_properties", "flexural_properties"] {
        has_keys(&result[block], &["e1", "e2", "g12", "nu12", "eta121", "eta122"]);
    }
}

#[test]
fn test_laminate_3d_response_shape() {
    let response = answer(laminate_3d_request());
    assert_eq!(response["status"], 200);

    let result = &response["result"];
    assert!(is_matrix(&result["Effective_3D_Stiffness_Matrix"], 6));
    assert!(is_matrix(&result["Effective_3D_Compliance_Matrix"], 6));
    has_keys(
        &result["Engineering_Constants"],
        &["E1", "E2", "E3", "G12", "G13", "G23", "nu12", "nu13", "nu23"],
    );
}

#[test]
fn test_udfrc_response_shape() {
    let response = answer(udfrc_request());
    assert_eq!(response["status"], 200);

    let result = &response["result"];
    for rule in ["Voigt_Rules_of_Mixture", "Reuss_Rules_of_Mixture", "Hybrid_Rules_of_Mixture"] {
        assert!(is_matrix(&result[rule]["Effective_3D_Stiffness_Matrix"], 6), "{rule}");
        has_keys(&result[rule]["Engineering_Constants"], &["E1", "G23", "nu23"]);
    }
}

#[test]
fn test_negative_modulus_is_rejected() {
    let mut request = lamina_request();
    request["E1"] = json!(-150000);
    let response = answer(request);
    assert_eq!(response["status"], 422);
    assert_eq!(response["error"]["code"], "INVALID_INPUT");
    assert_eq!(response["error"]["error"]["details"]["field"], "E1");
    assert!(response.get("result").is_none());
}

#[test]
fn test_poisson_out_of_range_is_rejected() {
    let mut request = laminate_3d_request();
    request["nu12"] = json!(1.0);
    let response = answer(request);
    assert_eq!(response["status"], 422);
    assert_eq!(response["error"]["error"]["details"]["field"], "nu12");
}

#[test]
fn test_volume_fraction_out_of_range_is_rejected() {
    let mut request = udfrc_request();
    request["fiber_volume_fraction"] = json!(1.5);
    let response = answer(request);
    assert_eq!(response["status"], 422);
    assert_eq!(response["error"]["error"]["details"]["field"], "fiber_volume_fraction");
}

#[test]
fn test_missing_field_is_rejected() {
    let mut request = plate_request();
    request.as_object_mut().unwrap().remove("G12");
    let response = answer(request);
    assert_eq!(response["status"], 422);
    assert_eq!(response["error"]["code"], "MISSING_FIELD");
    assert_eq!(response["error"]["error"]["details"]["field"], "G12");
}

#[test]
fn test_malformed_layup_is_rejected() {
    let mut request = plate_request();
    request["layup_sequence"] = json!("[0/90]2s2s");
    let response = answer(request);
    assert_eq!(response["status"], 422);
    assert_eq!(response["error"]["code"], "INVALID_LAYUP");
}

#[test]
fn test_mixed_batch() {
    let mut bad = udfrc_request();
    bad["matrix_nu"] = json!(0.9);
    let batch = json!([lamina_request(), bad, plate_request(), laminate_3d_request()]);

    let responses = handle_batch_json(&batch.to_string(), &ValidationLimits::default());
    let summary: Vec<(String, u16)> = responses.iter().map(|r| (r.calc_type.clone(), r.status)).collect();
    assert_eq!(
        summary,
        vec![
            ("lamina-engineering-constants".to_string(), 200),
            ("udfrc-properties".to_string(), 422),
            ("laminate-plate-properties".to_string(), 200),
            ("laminate-3d-properties".to_string(), 200),
        ]
    );
}
