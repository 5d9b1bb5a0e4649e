use appsearch_types::{DocumentId, GenericDocument, FINGERPRINT_PROPERTY};
use pretty_assertions::assert_eq;

#[test]
fn property_setters_round_trip() {
    let mut doc = GenericDocument::new("", "contact-7", "builtin:Person");
    doc.set_string("name", "Ada Lovelace");
    doc.set_string_array(
        "phoneNumbers",
        vec!["+1-555-0100".to_string(), "+1-555-0101".to_string()],
    );
    doc.set_long("contactId", 7);
    doc.set_boolean("starred", true);

    assert_eq!(doc.string_property("name"), Some("Ada Lovelace"));
    assert_eq!(doc.properties["phoneNumbers"].as_array().unwrap().len(), 2);
    assert_eq!(doc.properties["contactId"].as_i64(), Some(7));
    assert_eq!(doc.properties["starred"].as_bool(), Some(true));
    assert_eq!(doc.document_id(), DocumentId::new("", "contact-7"));
}

#[test]
fn canonical_serialization_is_order_independent() {
    let mut a = GenericDocument::new("ns", "id", "T");
    a.set_string("alpha", "1");
    a.set_string("beta", "2");

    let mut b = GenericDocument::new("ns", "id", "T");
    b.set_string("beta", "2");
    b.set_string("alpha", "1");

    let ja = serde_json::to_string(&a.properties).unwrap();
    let jb = serde_json::to_string(&b.properties).unwrap();
    assert_eq!(ja, jb);
}

#[test]
fn fingerprint_property_is_hex_decoded() {
    let mut doc = GenericDocument::new("ns", "id", "T");
    assert_eq!(doc.fingerprint(), None);

    doc.set_string(FINGERPRINT_PROPERTY, hex::encode([0xab, 0xcd]));
    assert_eq!(doc.fingerprint(), Some(vec![0xab, 0xcd]));

    doc.set_string(FINGERPRINT_PROPERTY, "not hex");
    assert_eq!(doc.fingerprint(), None);
}

#[test]
fn document_id_display() {
    let id = DocumentId::new("contacts", "42");
    assert_eq!(id.to_string(), "contacts#42");
}
