use chrono::NaiveDate;
use lexdraft_docs::{doctypes, FormError, FormState};
use serde_json::json;

// ── helpers ──────────────────────────────────────────────────────────────

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
}

fn will() -> (lexdraft_docs::DocumentSchema, FormState) {
    let schema = doctypes::get_schema("will").expect("will schema");
    let state = FormState::new(&schema, today());
    (schema, state)
}

fn partnership() -> (lexdraft_docs::DocumentSchema, FormState) {
    let schema = doctypes::get_schema("partnership").expect("partnership schema");
    let state = FormState::new(&schema, today());
    (schema, state)
}

// ── defaults ─────────────────────────────────────────────────────────────

#[test]
fn new_state_carries_schema_defaults() {
    let (_, state) = will();
    assert_eq!(state.text("dateOfDrafting"), "2025-01-15");
    assert_eq!(state.text("maritalStatus"), "single");
    assert_eq!(state.text("hasChildren"), "no");
    assert_eq!(state.entries("children").len(), 0);
    assert_eq!(state.entries("beneficiaries").len(), 1);
    assert_eq!(state.entries("witnesses").len(), 1);
}

#[test]
fn appended_entries_share_the_template_key_set() {
    let (schema, mut state) = will();
    state.append(&schema, "beneficiaries").expect("append");
    let entries = state.entries("beneficiaries");
    assert_eq!(entries.len(), 2);
    for entry in entries {
        let mut keys: Vec<&str> = entry.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["name", "relation", "share"]);
    }
}

// ── list length / order accounting ───────────────────────────────────────

#[test]
fn appends_and_removals_account_for_final_length() {
    let (schema, mut state) = will();
    let initial = state.entries("beneficiaries").len();

    for _ in 0..4 {
        state.append(&schema, "beneficiaries").expect("append");
    }
    state.remove_at(&schema, "beneficiaries", 0).expect("remove");
    state.remove_at(&schema, "beneficiaries", 2).expect("remove");

    assert_eq!(state.entries("beneficiaries").len(), initial + 4 - 2);
}

#[test]
fn surviving_entries_keep_their_order_after_removal() {
    let (schema, mut state) = will();
    state.append(&schema, "beneficiaries").expect("append");
    state.append(&schema, "beneficiaries").expect("append");
    for (idx, name) in ["Asha", "Bilal", "Chitra"].iter().enumerate() {
        state
            .update_at(&schema, "beneficiaries", idx, "name", name)
            .expect("update");
    }

    state.remove_at(&schema, "beneficiaries", 1).expect("remove");

    let names: Vec<&str> = state
        .entries("beneficiaries")
        .iter()
        .map(|e| e.get("name").map(String::as_str).unwrap_or(""))
        .collect();
    assert_eq!(names, vec!["Asha", "Chitra"]);
}

// ── update_at errors ─────────────────────────────────────────────────────

#[test]
fn update_at_out_of_range_is_an_error_not_a_noop() {
    let (schema, mut state) = will();
    let err = state
        .update_at(&schema, "beneficiaries", 5, "name", "x")
        .expect_err("index 5 of a 1-entry list");
    assert_eq!(
        err,
        FormError::IndexOutOfRange {
            field: "beneficiaries".into(),
            index: 5,
            len: 1,
        }
    );
}

#[test]
fn update_at_rejects_undeclared_subfield_keys() {
    let (schema, mut state) = will();
    let err = state
        .update_at(&schema, "beneficiaries", 0, "nickname", "x")
        .expect_err("nickname is not in the template");
    assert!(matches!(err, FormError::UnknownSubfield { .. }));
}

#[test]
fn list_ops_on_unknown_or_scalar_fields_fail() {
    let (schema, mut state) = will();
    assert!(matches!(
        state.append(&schema, "nonexistent"),
        Err(FormError::UnknownField(_))
    ));
    assert!(matches!(
        state.append(&schema, "testatorName"),
        Err(FormError::NotAList(_))
    ));
}

// ── minimum sizes ────────────────────────────────────────────────────────

#[test]
fn removal_below_minimum_is_refused_and_leaves_the_list_unchanged() {
    let (schema, mut state) = partnership();
    state
        .update_at(&schema, "partners", 0, "name", "Meera")
        .expect("update");
    let before = state.entries("partners").to_vec();

    let err = state
        .remove_at(&schema, "partners", 0)
        .expect_err("partnership requires two partners");
    assert_eq!(
        err,
        FormError::MinimumSize {
            field: "partners".into(),
            min: 2,
        }
    );
    assert_eq!(state.entries("partners"), &before[..]);
}

#[test]
fn removal_is_allowed_back_down_to_the_minimum() {
    let (schema, mut state) = partnership();
    state.append(&schema, "partners").expect("append");
    assert_eq!(state.entries("partners").len(), 3);
    state.remove_at(&schema, "partners", 2).expect("remove");
    assert_eq!(state.entries("partners").len(), 2);
}

// ── derived lists ────────────────────────────────────────────────────────

#[test]
fn profit_sharing_tracks_partner_count_with_blank_entries() {
    let (schema, mut state) = partnership();
    state
        .update_at(&schema, "profitSharing", 0, "name", "Meera")
        .expect("update");

    state.append(&schema, "partners").expect("append");
    let shares = state.entries("profitSharing");
    assert_eq!(shares.len(), 3);
    assert!(shares.iter().all(|s| s.values().all(String::is_empty)));

    state.remove_at(&schema, "partners", 2).expect("remove");
    assert_eq!(state.entries("profitSharing").len(), 2);
}

// ── conditional sections ─────────────────────────────────────────────────

#[test]
fn opening_a_conditional_section_seeds_exactly_one_blank_entry() {
    let (schema, mut state) = will();
    assert_eq!(state.entries("children").len(), 0);

    state
        .set_field(&schema, "hasChildren", &json!("yes"))
        .expect("set");
    let children = state.entries("children");
    assert_eq!(children.len(), 1);
    assert!(children[0].values().all(String::is_empty));
}

#[test]
fn closing_a_conditional_section_clears_it_regardless_of_content() {
    let (schema, mut state) = will();
    state
        .set_field(&schema, "hasChildren", &json!("yes"))
        .expect("set");
    state
        .update_at(&schema, "children", 0, "name", "Ravi")
        .expect("update");
    state.append(&schema, "children").expect("append");

    state
        .set_field(&schema, "hasChildren", &json!("no"))
        .expect("set");
    assert_eq!(state.entries("children").len(), 0);
}

#[test]
fn yes_no_round_trip_leaves_the_section_empty() {
    let (schema, mut state) = will();
    state
        .set_field(&schema, "hasChildren", &json!("yes"))
        .expect("set");
    state
        .set_field(&schema, "hasChildren", &json!("no"))
        .expect("set");
    assert_eq!(state.entries("children").len(), 0);
    assert_eq!(state.text("hasChildren"), "no");
}

#[test]
fn re_evaluating_a_steady_state_performs_no_mutation() {
    let (schema, mut state) = will();
    state
        .set_field(&schema, "hasChildren", &json!("yes"))
        .expect("set");
    state
        .update_at(&schema, "children", 0, "name", "Ravi")
        .expect("update");

    // Setting the toggle to the same value again must not reseed or clear.
    state
        .set_field(&schema, "hasChildren", &json!("yes"))
        .expect("set");
    let children = state.entries("children");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].get("name").map(String::as_str), Some("Ravi"));

    state
        .set_field(&schema, "hasChildren", &json!("no"))
        .expect("set");
    state
        .set_field(&schema, "hasChildren", &json!("no"))
        .expect("set");
    assert_eq!(state.entries("children").len(), 0);
}

// ── scalar / record updates ──────────────────────────────────────────────

#[test]
fn set_field_rejects_wrongly_typed_values() {
    let (schema, mut state) = will();
    assert!(matches!(
        state.set_field(&schema, "testatorName", &json!(42)),
        Err(FormError::TypeMismatch(_))
    ));
    assert!(matches!(
        state.set_field(&schema, "children", &json!("nope")),
        Err(FormError::TypeMismatch(_))
    ));
}

#[test]
fn record_fields_merge_declared_keys_and_reject_others() {
    let (schema, mut state) = will();
    state
        .set_field(&schema, "parents", &json!({ "father": "Dev" }))
        .expect("set father");
    state
        .set_field(&schema, "parents", &json!({ "mother": "Lata" }))
        .expect("set mother");
    let parents = state.record("parents").expect("parents record");
    assert_eq!(parents.get("father").map(String::as_str), Some("Dev"));
    assert_eq!(parents.get("mother").map(String::as_str), Some("Lata"));

    assert!(matches!(
        state.set_field(&schema, "parents", &json!({ "uncle": "Anil" })),
        Err(FormError::UnknownSubfield { .. })
    ));
}
