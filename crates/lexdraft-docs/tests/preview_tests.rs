use chrono::NaiveDate;
use lexdraft_docs::preview::PLACEHOLDER;
use lexdraft_docs::{doctypes, FormState};
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
}

fn state_for(doc: &str) -> (lexdraft_docs::DocumentSchema, FormState) {
    let schema = doctypes::get_schema(doc).expect("schema");
    let state = FormState::new(&schema, today());
    (schema, state)
}

// ── determinism ──────────────────────────────────────────────────────────

#[test]
fn identical_state_renders_byte_identical_output() {
    let (schema, mut state) = state_for("will");
    state
        .set_field(&schema, "testatorName", &json!("Asha Rao"))
        .expect("set");
    state
        .update_at(&schema, "beneficiaries", 0, "name", "Bilal")
        .expect("update");

    let first = doctypes::render(&schema, &state);
    let second = doctypes::render(&schema, &state);
    assert_eq!(first, second);
    assert_eq!(first.to_text(), second.to_text());
}

// ── placeholder substitution ─────────────────────────────────────────────

#[test]
fn empty_scalars_render_the_placeholder_token() {
    let (schema, state) = state_for("lease");
    let text = doctypes::render(&schema, &state).to_text();
    // Nothing has been filled in, so the parties paragraph is placeholders.
    assert!(text.contains(&format!("between {PLACEHOLDER}, residing at {PLACEHOLDER}")));
}

#[test]
fn filled_scalars_replace_the_placeholder() {
    let (schema, mut state) = state_for("lease");
    state
        .set_field(&schema, "landlordName", &json!("Meera Kapoor"))
        .expect("set");
    let text = doctypes::render(&schema, &state).to_text();
    assert!(text.contains("between Meera Kapoor, residing at"));
}

// ── blank-row skipping ───────────────────────────────────────────────────

#[test]
fn rows_with_an_empty_primary_subfield_never_render() {
    let (schema, mut state) = state_for("will");
    // The seeded beneficiary row is blank: the whole section stays out.
    let text = doctypes::render(&schema, &state).to_text();
    assert!(!text.contains("A. Beneficiaries:"));

    // Populating only secondary subfields still skips the row.
    state
        .update_at(&schema, "beneficiaries", 0, "relation", "daughter")
        .expect("update");
    state
        .update_at(&schema, "beneficiaries", 0, "share", "50")
        .expect("update");
    let text = doctypes::render(&schema, &state).to_text();
    assert!(!text.contains("A. Beneficiaries:"));
    assert!(!text.contains("daughter"));

    // Filling the primary subfield makes the row appear.
    state
        .update_at(&schema, "beneficiaries", 0, "name", "Bilal")
        .expect("update");
    let text = doctypes::render(&schema, &state).to_text();
    assert!(text.contains("A. Beneficiaries:"));
    assert!(text.contains("Bilal | daughter | 50%"));
}

#[test]
fn numbering_follows_render_order_not_stored_indices() {
    let (schema, mut state) = state_for("partnership");
    state.append(&schema, "partners").expect("append");
    for (idx, name) in ["Asha", "Bilal", "Chitra"].iter().enumerate() {
        state
            .update_at(&schema, "partners", idx, "name", name)
            .expect("update");
    }
    state.remove_at(&schema, "partners", 0).expect("remove");

    let text = doctypes::render(&schema, &state).to_text();
    assert!(text.contains("Partner 1: Bilal"));
    assert!(text.contains("Partner 2: Chitra"));
    assert!(!text.contains("Partner 3:"));
}

// ── lease end-to-end (spec scenario) ─────────────────────────────────────

#[test]
fn lease_preview_reflects_rent_and_parties_and_hides_untouched_conditionals() {
    let (schema, mut state) = state_for("lease");
    state
        .set_field(&schema, "monthlyRent", &json!("15000"))
        .expect("set rent");
    state
        .set_field(&schema, "landlordName", &json!("A"))
        .expect("set landlord");
    state
        .set_field(&schema, "tenantName", &json!("B"))
        .expect("set tenant");

    let text = doctypes::render(&schema, &state).to_text();

    assert!(text.contains("₹ 15000"));
    assert!(!text.contains(&format!("₹ {PLACEHOLDER}, payable")));
    assert!(text.contains("Landlord: A\nTenant: B"));
    assert!(text.contains("between A, residing at"));

    // petRestrictions was never touched: the clause must be absent, not
    // rendered with a placeholder.
    assert!(!text.contains("Restrictions:"));
}

#[test]
fn pet_restrictions_render_only_when_present() {
    let (schema, mut state) = state_for("lease");
    state
        .set_field(&schema, "arePetsAllowed", &json!(true))
        .expect("set");
    state
        .set_field(&schema, "petRestrictions", &json!("cats only"))
        .expect("set");
    let text = doctypes::render(&schema, &state).to_text();
    assert!(text.contains("Pets are allowed. Restrictions: cats only"));
}

// ── children end-to-end (spec scenario) ──────────────────────────────────

#[test]
fn children_section_seeds_on_yes_and_empties_on_no() {
    let (schema, mut state) = state_for("will");
    assert_eq!(state.entries("children").len(), 0);

    state
        .set_field(&schema, "hasChildren", &json!("yes"))
        .expect("set yes");
    assert_eq!(state.entries("children").len(), 1);
    assert!(state.entries("children")[0].values().all(String::is_empty));

    state
        .set_field(&schema, "hasChildren", &json!("no"))
        .expect("set no");
    assert_eq!(state.entries("children").len(), 0);

    let text = doctypes::render(&schema, &state).to_text();
    assert!(!text.contains("Children:"));
}

// ── filenames ────────────────────────────────────────────────────────────

#[test]
fn will_filename_embeds_testator_and_date() {
    let (schema, mut state) = state_for("will");
    state
        .set_field(&schema, "testatorName", &json!("John Ravi Doe"))
        .expect("set");
    assert_eq!(
        doctypes::export_filename(&schema, &state),
        "Will_John_Ravi_Doe_2025-01-15.pdf"
    );
}

#[test]
fn other_document_types_use_fixed_filenames() {
    for (doc, expected) in [
        ("lease", "Lease_Agreement.pdf"),
        ("divorce", "Divorce_Petition.pdf"),
        ("nda", "NDA_Agreement.pdf"),
        ("partnership", "Partnership_Deed.pdf"),
    ] {
        let (schema, state) = state_for(doc);
        assert_eq!(doctypes::export_filename(&schema, &state), expected);
    }
}

// ── export pipeline ──────────────────────────────────────────────────────

#[test]
fn export_produces_a_pdf_artifact() {
    let (schema, mut state) = state_for("nda");
    state
        .set_field(&schema, "disclosingPartyName", &json!("Acme Pvt Ltd"))
        .expect("set");
    let view = doctypes::render(&schema, &state);
    let bytes = lexdraft_docs::export::export_pdf(&view).expect("export");
    assert!(bytes.starts_with(b"%PDF"));
}

// ── registry ─────────────────────────────────────────────────────────────

#[test]
fn all_five_document_types_are_registered() {
    let names: Vec<String> = doctypes::all_schemas().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["will", "lease", "divorce", "nda", "partnership"]);
    assert!(doctypes::get_schema("lease").is_some());
    assert!(doctypes::get_schema("affidavit").is_none());
}
