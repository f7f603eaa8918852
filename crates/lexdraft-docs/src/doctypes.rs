//! The five supported document types: schema definitions, preview
//! templates, and export filenames. Everything here is data plus pure
//! rendering; the generic engine lives in [`crate::state`].

use crate::preview::{DocumentView, Section, Tpl};
use crate::schema::{entries, DocumentSchema, FieldSpec, ListSpec};
use crate::state::FormState;

pub fn all_schemas() -> Vec<DocumentSchema> {
    vec![
        will_schema(),
        lease_schema(),
        divorce_schema(),
        nda_schema(),
        partnership_schema(),
    ]
}

pub fn get_schema(name: &str) -> Option<DocumentSchema> {
    all_schemas().into_iter().find(|s| s.name == name)
}

/// Render the preview for any supported document type.
pub fn render(schema: &DocumentSchema, state: &FormState) -> DocumentView {
    let t = Tpl::new(schema, state);
    match schema.name.as_str() {
        "will" => render_will(&t),
        "lease" => render_lease(&t),
        "divorce" => render_divorce(&t),
        "nda" => render_nda(&t),
        "partnership" => render_partnership(&t),
        _ => DocumentView {
            title: schema.label.clone(),
            subtitle: None,
            sections: Vec::new(),
        },
    }
}

/// Deterministic name for the exported artifact. Wills carry the testator
/// name and drafting date; the other types use fixed names.
pub fn export_filename(schema: &DocumentSchema, state: &FormState) -> String {
    match schema.name.as_str() {
        "will" => {
            let name = state
                .text("testatorName")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_");
            format!("Will_{}_{}.pdf", name, state.text("dateOfDrafting"))
        }
        "lease" => "Lease_Agreement.pdf".to_string(),
        "divorce" => "Divorce_Petition.pdf".to_string(),
        "nda" => "NDA_Agreement.pdf".to_string(),
        "partnership" => "Partnership_Deed.pdf".to_string(),
        other => format!("{other}.pdf"),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ── Will ─────────────────────────────────────────────────────────────────

pub fn will_schema() -> DocumentSchema {
    DocumentSchema {
        name: "will".into(),
        label: "Last Will & Testament".into(),
        fields: vec![
            FieldSpec::date_today("dateOfDrafting"),
            FieldSpec::text("testatorName"),
            FieldSpec::text("testatorAddress"),
            FieldSpec::date("dateOfBirth"),
            FieldSpec::text("aadhaarNumber"),
            FieldSpec::text_default("maritalStatus", "single"),
            FieldSpec::text("spouseName"),
            FieldSpec::text_default("hasChildren", "no"),
            FieldSpec::list(
                "children",
                ListSpec {
                    gated_by: Some("hasChildren".into()),
                    ..entries(&["name", "dateOfBirth"], 1, 0)
                },
            ),
            FieldSpec::record("parents", &["father", "mother"]),
            FieldSpec::text_default("hasSiblings", "no"),
            FieldSpec::list(
                "siblings",
                ListSpec {
                    gated_by: Some("hasSiblings".into()),
                    ..entries(&["name", "relation"], 1, 0)
                },
            ),
            FieldSpec::text("executorName"),
            FieldSpec::text("executorAddress"),
            FieldSpec::text("alternateExecutorName"),
            FieldSpec::text("alternateExecutorAddress"),
            FieldSpec::list("beneficiaries", entries(&["name", "relation", "share"], 1, 1)),
            FieldSpec::list("specificBequests", entries(&["item", "recipient"], 1, 1)),
            FieldSpec::list("debts", entries(&["institution", "amount", "instructions"], 1, 1)),
            FieldSpec::text("guardianshipDetails"),
            FieldSpec::list("witnesses", entries(&["name", "address"], 1, 1)),
            FieldSpec::text("funeralPreferences"),
            FieldSpec::list("charitableDonations", entries(&["organization", "amount"], 1, 1)),
        ],
    }
}

fn render_will(t: &Tpl) -> DocumentView {
    let mut sections = Vec::new();

    sections.push(Section::new(None).para(format!(
        "This Last Will and Testament is executed on {} by me, {}, residing at {}, \
         born on {}, bearing Aadhaar Number {}.",
        t.get("dateOfDrafting"),
        t.get("testatorName"),
        t.get("testatorAddress"),
        t.get("dateOfBirth"),
        t.get("aadhaarNumber"),
    )));

    sections.push(Section::new(Some("1. DECLARATION")).para(format!(
        "I, {}, being of sound mind and disposing memory, do hereby make this my \
         Last Will and Testament, revoking all previous wills and codicils made by me.",
        t.get("testatorName"),
    )));

    let mut personal = Section::new(Some("2. PERSONAL DETAILS")).para(format!(
        "Marital Status: {}",
        capitalize(t.state.text("maritalStatus")),
    ));
    if t.state.text("maritalStatus") == "married" {
        if let Some(spouse) = t.opt("spouseName") {
            personal = personal.para(format!("Spouse Name: {spouse}"));
        }
    }
    personal = personal.para(format!(
        "Father's Name: {}\nMother's Name: {}",
        t.rec("parents", "father"),
        t.rec("parents", "mother"),
    ));
    let children: Vec<String> = t
        .rows("children")
        .iter()
        .map(|c| format!("{} (DOB: {})", Tpl::cell(c, "name"), Tpl::cell(c, "dateOfBirth")))
        .collect();
    if t.state.text("hasChildren") == "yes" && !children.is_empty() {
        personal = personal.para("Children:".to_string()).items(children);
    }
    let siblings: Vec<String> = t
        .rows("siblings")
        .iter()
        .map(|s| format!("{} ({})", Tpl::cell(s, "name"), Tpl::cell(s, "relation")))
        .collect();
    if t.state.text("hasSiblings") == "yes" && !siblings.is_empty() {
        personal = personal.para("Siblings:".to_string()).items(siblings);
    }
    sections.push(personal);

    let mut executor = Section::new(Some("3. APPOINTMENT OF EXECUTOR")).para(format!(
        "I hereby appoint {}, residing at {}, as the Executor of this Will to \
         administer my estate according to the terms herein.",
        t.get("executorName"),
        t.get("executorAddress"),
    ));
    if let Some(alternate) = t.opt("alternateExecutorName") {
        executor = executor.para(format!(
            "In the event that the primary executor is unable or unwilling to serve, \
             I appoint {}, residing at {}, as the Alternate Executor.",
            alternate,
            t.get("alternateExecutorAddress"),
        ));
    }
    sections.push(executor);

    let mut estate = Section::new(Some("4. DISTRIBUTION OF ESTATE"));
    let beneficiary_rows: Vec<Vec<String>> = t
        .rows("beneficiaries")
        .iter()
        .map(|b| {
            vec![
                Tpl::cell(b, "name"),
                Tpl::cell(b, "relation"),
                format!("{}%", Tpl::cell(b, "share")),
            ]
        })
        .collect();
    if !beneficiary_rows.is_empty() {
        estate = estate
            .para("A. Beneficiaries:".to_string())
            .table(&["Name", "Relation", "Share (%)"], beneficiary_rows);
    }
    let bequests: Vec<String> = t
        .rows("specificBequests")
        .iter()
        .map(|b| {
            format!(
                "{} to be given to {}",
                Tpl::cell(b, "item"),
                Tpl::cell(b, "recipient"),
            )
        })
        .collect();
    if !bequests.is_empty() {
        estate = estate.para("B. Specific Bequests:".to_string()).items(bequests);
    }
    sections.push(estate);

    let debts: Vec<String> = t
        .rows("debts")
        .iter()
        .map(|d| {
            let mut line = format!(
                "{} - Amount: ₹{}",
                Tpl::cell(d, "institution"),
                Tpl::cell(d, "amount"),
            );
            if let Some(instructions) = d.get("instructions").filter(|i| !i.trim().is_empty()) {
                line.push_str(&format!(" ({instructions})"));
            }
            line
        })
        .collect();
    if !debts.is_empty() {
        sections.push(
            Section::new(Some("5. DEBTS AND LIABILITIES"))
                .para("I direct my Executor to settle the following debts from my estate:")
                .items(debts),
        );
    }

    if let Some(guardianship) = t.opt("guardianshipDetails") {
        sections.push(Section::new(Some("6. GUARDIANSHIP")).para(guardianship));
    }

    let donations: Vec<String> = t
        .rows("charitableDonations")
        .iter()
        .map(|d| {
            format!(
                "{} - ₹{}",
                Tpl::cell(d, "organization"),
                Tpl::cell(d, "amount"),
            )
        })
        .collect();
    if !donations.is_empty() {
        sections.push(Section::new(Some("7. CHARITABLE DONATIONS")).items(donations));
    }

    if let Some(funeral) = t.opt("funeralPreferences") {
        sections.push(Section::new(Some("8. FUNERAL PREFERENCES")).para(funeral));
    }

    let mut attestation = Section::new(Some("9. ATTESTATION"))
        .para(format!(
            "IN WITNESS WHEREOF, I have hereunto set my hand and seal on this {}.",
            t.get("dateOfDrafting"),
        ))
        .signature(t.get("testatorName"), "Testator")
        .para(
            "Signed by the above-named Testator as their Last Will and Testament in the \
             presence of us, present at the same time, who have hereunto subscribed our \
             names as witnesses:",
        );
    for (idx, witness) in t.rows("witnesses").iter().enumerate() {
        attestation = attestation.signature(
            format!(
                "Witness {}: {}, {}",
                idx + 1,
                Tpl::cell(witness, "name"),
                Tpl::cell(witness, "address"),
            ),
            "Witness",
        );
    }
    sections.push(attestation);

    sections.push(Section::new(None).para(
        "Note: This is a sample will drafted based on the information provided. It is \
         recommended to consult with a qualified legal professional to ensure compliance \
         with all applicable laws and to address any specific circumstances.",
    ));

    DocumentView {
        title: "LAST WILL AND TESTAMENT".into(),
        subtitle: None,
        sections,
    }
}

// ── Lease ────────────────────────────────────────────────────────────────

pub fn lease_schema() -> DocumentSchema {
    DocumentSchema {
        name: "lease".into(),
        label: "Lease Agreement".into(),
        fields: vec![
            FieldSpec::date_today("dateOfAgreement"),
            FieldSpec::text("propertyAddress"),
            FieldSpec::text("propertyType"),
            FieldSpec::date("leaseStartDate"),
            FieldSpec::date("leaseEndDate"),
            FieldSpec::text("monthlyRent"),
            FieldSpec::text("rentDueDay"),
            FieldSpec::text("lateFeeGracePeriod"),
            FieldSpec::text("lateFeeAmount"),
            FieldSpec::text("additionalDailyLateFee"),
            FieldSpec::text("securityDepositAmount"),
            FieldSpec::text("landlordName"),
            FieldSpec::text("landlordAddress"),
            FieldSpec::text("tenantName"),
            FieldSpec::text("tenantAddress"),
            FieldSpec::string_list("landlordUtilitiesResponsibility", &[]),
            FieldSpec::string_list("tenantUtilitiesResponsibility", &[]),
            FieldSpec::flag("arePetsAllowed", false),
            FieldSpec::text("petRestrictions"),
            FieldSpec::flag("alterationsAllowed", false),
            FieldSpec::text("leaseDeedSigning"),
            FieldSpec::text("additionalTerms"),
            FieldSpec::text("witnessName"),
            FieldSpec::text("witnessAddress"),
            FieldSpec::text("addWitnessName"),
            FieldSpec::text("addWitnessAddress"),
        ],
    }
}

fn render_lease(t: &Tpl) -> DocumentView {
    let mut sections = Vec::new();

    sections.push(Section::new(None).para(format!(
        "This Lease Agreement is made on {} between {}, residing at {}, hereinafter \
         referred to as the \u{201c}LESSOR\u{201d} (Landlord), and {}, residing at {}, \
         hereinafter referred to as the \u{201c}LESSEE\u{201d} (Tenant).",
        t.get("dateOfAgreement"),
        t.get("landlordName"),
        t.get("landlordAddress"),
        t.get("tenantName"),
        t.get("tenantAddress"),
    )));

    sections.push(Section::new(None).para(format!(
        "WHEREAS the Lessor is the lawful owner of the property situated at {} ({}) and \
         has agreed to let out the said property to the Lessee for rent on the terms and \
         conditions hereinafter contained.",
        t.get("propertyAddress"),
        t.opt("propertyType")
            .unwrap_or_else(|| "Residential/Commercial".to_string()),
    )));

    let mut deed = Section::new(None).para("NOW THIS DEED WITNESSETH AS FOLLOWS:");
    deed = deed.para(format!(
        "1. The tenancy shall commence on {} and remain in force until {}.",
        t.get("leaseStartDate"),
        t.get("leaseEndDate"),
    ));
    deed = deed.para(format!(
        "2. The monthly rent shall be ₹ {}, payable on or before the {} of each month.",
        t.get("monthlyRent"),
        t.get("rentDueDay"),
    ));
    deed = deed.para(format!(
        "3. The Lessee shall pay a security deposit of ₹ {}, refundable at the end of \
         the lease term subject to conditions.",
        t.get("securityDepositAmount"),
    ));
    deed = deed.para(format!(
        "4. In case of delay in payment of rent beyond {} days, a late fee of ₹ {} and \
         an additional ₹ {} per day thereafter shall apply.",
        t.get("lateFeeGracePeriod"),
        t.get("lateFeeAmount"),
        t.get("additionalDailyLateFee"),
    ));
    deed = deed.para(format!(
        "5. Utilities responsibility:\nLandlord: {}\nTenant: {}",
        t.join("landlordUtilitiesResponsibility"),
        t.join("tenantUtilitiesResponsibility"),
    ));
    let mut pets = format!(
        "6. Pets are {}.",
        if t.flag("arePetsAllowed") {
            "allowed"
        } else {
            "not allowed"
        },
    );
    if let Some(restrictions) = t.opt("petRestrictions") {
        pets.push_str(&format!(" Restrictions: {restrictions}"));
    }
    deed = deed.para(pets);
    deed = deed.para(format!(
        "7. Alterations to the premises are {} without written consent of the Lessor.",
        if t.flag("alterationsAllowed") {
            "allowed"
        } else {
            "not allowed"
        },
    ));
    if let Some(terms) = t.opt("additionalTerms") {
        deed = deed.para(format!("8. Additional Terms: {terms}"));
    }
    sections.push(deed);

    sections.push(
        Section::new(None)
            .para(format!(
                "IN WITNESS WHEREOF, the parties have executed this Lease Agreement on {} at {}.",
                t.get("dateOfAgreement"),
                t.get("leaseDeedSigning"),
            ))
            .para(format!(
                "Landlord: {}\nTenant: {}",
                t.get("landlordName"),
                t.get("tenantName"),
            ))
            .para(format!(
                "Witness 1: {}, {}\nWitness 2: {}, {}",
                t.get("witnessName"),
                t.get("witnessAddress"),
                t.get("addWitnessName"),
                t.get("addWitnessAddress"),
            )),
    );

    DocumentView {
        title: "LEASE AGREEMENT".into(),
        subtitle: Some("(Sample Indian Legal Format)".into()),
        sections,
    }
}

// ── Divorce ──────────────────────────────────────────────────────────────

pub fn divorce_schema() -> DocumentSchema {
    DocumentSchema {
        name: "divorce".into(),
        label: "Divorce Agreement".into(),
        fields: vec![
            FieldSpec::date_today("dateOfVerification"),
            FieldSpec::text("verificationPlace"),
            FieldSpec::text("petitioner1Name"),
            FieldSpec::text("petitioner1Age"),
            FieldSpec::text("petitioner1Occupation"),
            FieldSpec::text("petitioner1Address"),
            FieldSpec::text("petitioner1MobileNo"),
            FieldSpec::text("petitioner1EmailID"),
            FieldSpec::text("petitioner1PreMaritalStatus"),
            FieldSpec::text("petitioner1Religion"),
            FieldSpec::text("petitioner1PermanentResidence"),
            FieldSpec::text("petitioner2Name"),
            FieldSpec::text("petitioner2MaidenName"),
            FieldSpec::text("petitioner2Age"),
            FieldSpec::text("petitioner2Occupation"),
            FieldSpec::text("petitioner2Address"),
            FieldSpec::text("petitioner2MobileNo"),
            FieldSpec::text("petitioner2EmailID"),
            FieldSpec::text("petitioner2PreMaritalStatus"),
            FieldSpec::text("petitioner2Religion"),
            FieldSpec::text("petitioner2PermanentResidence"),
            FieldSpec::text_default("reasonForSeparation", "Mutual Consent"),
            FieldSpec::date("separationDate"),
            FieldSpec::date("marriageDate"),
            FieldSpec::text("marriageLocation"),
            FieldSpec::text("marriageRites"),
            FieldSpec::text("marriageRegistrationDetails"),
            FieldSpec::text("childrenDetails"),
            FieldSpec::text("custodyAgreement"),
            FieldSpec::text("spousalSupportDetails"),
            FieldSpec::text("propertyDivision"),
            FieldSpec::text("exchangeOfArticles"),
            FieldSpec::text("pendingLitigations"),
            FieldSpec::text("withdrawalOfLitigations"),
            FieldSpec::text("additionalTerms"),
            FieldSpec::text("advocate1Name"),
            FieldSpec::text("advocate2Name"),
            FieldSpec::flag("courtFeePaid", true),
        ],
    }
}

fn render_divorce(t: &Tpl) -> DocumentView {
    let mut sections = Vec::new();

    sections.push(Section::new(None).para(format!(
        "IN THE MATTER OF:\n{} …Petitioner No.1\n(AND)\n{} …Petitioner No.2",
        t.get("petitioner1Name"),
        t.get("petitioner2Name"),
    )));

    sections.push(Section::new(None).para(
        "PETITION UNDER SECTION 13 (1) (i-b) OF THE HMA FOR DISSOLUTION OF MARRIAGE \
         BY MUTUAL CONSENT.",
    ));

    let mut body = Section::new(None).para(format!(
        "1. That the marriage between the parties was solemnized on {} at {} by {} rites \
         and ceremonies. The said marriage was consummated thereafter, and the parties \
         cohabited as husband and wife at the matrimonial home i.e. {}.",
        t.get("marriageDate"),
        t.get("marriageLocation"),
        t.get("marriageRites"),
        t.get("petitioner1Address"),
    ));
    body = body.para(format!(
        "2. That the parties have been living separately since {} due to {}.",
        t.get("separationDate"),
        t.get("reasonForSeparation"),
    ));
    body = body.para(
        "3. That both the petitioners have mutually agreed to dissolve their marriage \
         and have settled all their respective claims regarding maintenance, property, \
         and custody of children.",
    );
    if let Some(children) = t.opt("childrenDetails") {
        let mut text = format!("4. Details of children and custody arrangement: {children}.");
        if let Some(custody) = t.opt("custodyAgreement") {
            text.push(' ');
            text.push_str(&custody);
        }
        body = body.para(text);
    }
    sections.push(body);

    sections.push(
        Section::new(None)
            .para(format!(
                "This agreement is made and verified on {} at {}.",
                t.get("dateOfVerification"),
                t.get("verificationPlace"),
            ))
            .para(format!(
                "Petitioner 1: {}\nPetitioner 2: {}",
                t.get("petitioner1Name"),
                t.get("petitioner2Name"),
            ))
            .para(format!(
                "Advocate 1: {}\nAdvocate 2: {}",
                t.get("advocate1Name"),
                t.get("advocate2Name"),
            )),
    );

    DocumentView {
        title: "MUTUAL DIVORCE PETITION".into(),
        subtitle: Some("BEFORE THE DISTRICT JUDGE, HMA PETITION No._______ OF _______".into()),
        sections,
    }
}

// ── NDA ──────────────────────────────────────────────────────────────────

pub fn nda_schema() -> DocumentSchema {
    DocumentSchema {
        name: "nda".into(),
        label: "Non-Disclosure Agreement".into(),
        fields: vec![
            FieldSpec::date_today("dateOfDrafting"),
            FieldSpec::string_list(
                "confidentialInformation",
                &[
                    "Business Operations",
                    "Customer Data",
                    "Services Provided",
                    "Intellectual Property",
                    "Product Information",
                    "Production Processes",
                    "Accounting and Finances",
                    "Marketing and Development",
                    "Computer Technology and Security",
                    "Third Party Information",
                ],
            ),
            FieldSpec::text("disclosingPartyName"),
            FieldSpec::text("disclosingPartyAddress"),
            FieldSpec::text("receivingPartyName"),
            FieldSpec::text("receivingPartyAddress"),
            FieldSpec::text_default("nonCompeteClause", "No"),
            FieldSpec::text("nonCompeteDuration"),
            FieldSpec::text_default("nonSolicitClause", "No"),
            FieldSpec::text("nonSolicitDuration"),
            FieldSpec::text_default("termDuration", "Indefinitely"),
            FieldSpec::text("witnessName"),
            FieldSpec::text("witnessAddress"),
            FieldSpec::text("addWitnessName"),
            FieldSpec::text("addWitnessAddress"),
        ],
    }
}

fn clause_with_duration(t: &Tpl, clause: &str, duration: &str) -> String {
    if t.state.text(clause) == "Yes" {
        format!("Yes (Duration: {})", t.get(duration))
    } else {
        "No".to_string()
    }
}

fn render_nda(t: &Tpl) -> DocumentView {
    let mut sections = Vec::new();

    sections.push(
        Section::new(None)
            .para(format!("Date: {}", t.get("dateOfDrafting")))
            .para(format!(
                "This Non-Disclosure Agreement (\u{201c}Agreement\u{201d}) is made between {}, \
                 residing at {} (the \u{201c}Disclosing Party\u{201d}), and {}, residing at {} \
                 (the \u{201c}Receiving Party\u{201d}).",
                t.get("disclosingPartyName"),
                t.get("disclosingPartyAddress"),
                t.get("receivingPartyName"),
                t.get("receivingPartyAddress"),
            )),
    );

    sections.push(
        Section::new(None)
            .para(format!(
                "1. Definition of Confidential Information: Confidential Information includes \
                 but is not limited to: {}.",
                t.join("confidentialInformation"),
            ))
            .para(
                "2. Obligations of Receiving Party: The Receiving Party agrees to maintain \
                 confidentiality and not disclose, publish, or reproduce any Confidential \
                 Information without prior written consent of the Disclosing Party.",
            )
            .para(format!(
                "3. Non-Compete and Non-Solicit:\nNon-Compete Clause: {}\nNon-Solicit Clause: {}",
                clause_with_duration(t, "nonCompeteClause", "nonCompeteDuration"),
                clause_with_duration(t, "nonSolicitClause", "nonSolicitDuration"),
            ))
            .para(format!(
                "4. Term and Duration: This Agreement shall remain in effect {}.",
                t.get("termDuration"),
            ))
            .para(format!(
                "5. Witnesses:\nWitness 1: {}, {}\nWitness 2: {}, {}",
                t.get("witnessName"),
                t.get("witnessAddress"),
                t.get("addWitnessName"),
                t.get("addWitnessAddress"),
            )),
    );

    sections.push(
        Section::new(None)
            .para(
                "IN WITNESS WHEREOF, both parties acknowledge that they have read and \
                 understood this Agreement and agree to be bound by its terms.",
            )
            .signature(t.get("disclosingPartyName"), "Disclosing Party Signature")
            .signature(t.get("receivingPartyName"), "Receiving Party Signature"),
    );

    DocumentView {
        title: "NON-DISCLOSURE AGREEMENT (NDA)".into(),
        subtitle: Some("(Sample Indian Legal Format)".into()),
        sections,
    }
}

// ── Partnership ──────────────────────────────────────────────────────────

pub fn partnership_schema() -> DocumentSchema {
    DocumentSchema {
        name: "partnership".into(),
        label: "Partnership Deed".into(),
        fields: vec![
            FieldSpec::date_today("dateOfExecution"),
            FieldSpec::text("executionPlace"),
            FieldSpec::list(
                "partners",
                ListSpec {
                    derived: Some("profitSharing".into()),
                    ..entries(&["name", "age", "fatherName", "residence"], 2, 2)
                },
            ),
            FieldSpec::text("businessType"),
            FieldSpec::text("firmName"),
            FieldSpec::text("principalPlaceOfBusiness"),
            FieldSpec::date("originalDeedDate"),
            FieldSpec::list("workingPartners", entries(&["name", "remunerationPercentage"], 1, 1)),
            FieldSpec::list("profitSharing", entries(&["name", "profitSharePercentage"], 2, 2)),
            FieldSpec::text("bankOperationMode"),
            FieldSpec::list("nonWorkingPartners", entries(&["name"], 1, 1)),
            FieldSpec::list("witnesses", entries(&["name"], 2, 2)),
            FieldSpec::text("additionalTerms"),
        ],
    }
}

fn render_partnership(t: &Tpl) -> DocumentView {
    let mut sections = Vec::new();

    let mut opening = Section::new(None).para(format!(
        "This Partnership Deed is executed on {} at {} between:",
        t.get("dateOfExecution"),
        t.get("executionPlace"),
    ));
    for (idx, partner) in t.rows("partners").iter().enumerate() {
        opening = opening.para(format!(
            "Partner {}: {}, aged {}, son/daughter of {}, residing at {}.",
            idx + 1,
            Tpl::cell(partner, "name"),
            Tpl::cell(partner, "age"),
            Tpl::cell(partner, "fatherName"),
            Tpl::cell(partner, "residence"),
        ));
    }
    sections.push(opening);

    sections.push(Section::new(None).para(format!(
        "Business Name: {}\nPrincipal Place of Business: {}\nType of Business: {}\nOriginal Deed Date: {}",
        t.get("firmName"),
        t.get("principalPlaceOfBusiness"),
        t.get("businessType"),
        t.get("originalDeedDate"),
    )));

    let working: Vec<String> = t
        .rows("workingPartners")
        .iter()
        .map(|wp| {
            format!(
                "{} - {}%",
                Tpl::cell(wp, "name"),
                Tpl::cell(wp, "remunerationPercentage"),
            )
        })
        .collect();
    sections.push(Section::new(Some("Working Partners and Remuneration:")).items(working));

    let shares: Vec<String> = t
        .rows("profitSharing")
        .iter()
        .map(|ps| {
            format!(
                "{} - {}%",
                Tpl::cell(ps, "name"),
                Tpl::cell(ps, "profitSharePercentage"),
            )
        })
        .collect();
    sections.push(Section::new(Some("Profit Sharing:")).items(shares));

    let non_working: Vec<String> = t
        .rows("nonWorkingPartners")
        .iter()
        .map(|np| Tpl::cell(np, "name"))
        .collect();
    sections.push(Section::new(Some("Non-Working Partners:")).items(non_working));

    sections.push(Section::new(Some("Bank Operation Mode:")).para(t.get("bankOperationMode")));

    let witnesses: Vec<String> = t
        .rows("witnesses")
        .iter()
        .map(|w| Tpl::cell(w, "name"))
        .collect();
    sections.push(Section::new(Some("Witnesses:")).items(witnesses));

    if let Some(terms) = t.opt("additionalTerms") {
        sections.push(Section::new(None).para(format!("Additional Terms: {terms}")));
    }

    DocumentView {
        title: "PARTNERSHIP DEED".into(),
        subtitle: Some("(Sample Indian Legal Format)".into()),
        sections,
    }
}
