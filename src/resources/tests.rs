//! Tests for domain entities and resource operations

use super::*;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::types::Method;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::cell::RefCell;

const ADD_ON_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<add_on href="https://acme.ledgera.com/v2/plans/gold/add_ons/ip">
  <add_on_code>ip</add_on_code>
  <name>Extra IPs</name>
  <accounting_code>acc-7</accounting_code>
  <default_quantity>2</default_quantity>
  <display_quantity_on_hosted_page>true</display_quantity_on_hosted_page>
  <optional>false</optional>
  <measured_unit_id>12345</measured_unit_id>
  <add_on_type>usage</add_on_type>
  <usage_type>per_unit</usage_type>
  <tax_code>digital</tax_code>
  <unit_amount_in_cents>
    <USD>200</USD>
    <EUR>180</EUR>
  </unit_amount_in_cents>
  <created_at>2024-03-01T09:30:00Z</created_at>
  <updated_at>2024-03-02T10:00:00+02:00</updated_at>
</add_on>"#;

fn populated_add_on() -> AddOn {
    let mut add_on = AddOn::new("gold", "ip", "Extra IPs");
    add_on.default_quantity = 2;
    add_on.accounting_code = "acc-7".into();
    add_on.display_quantity_on_hosted_page = Some(true);
    add_on.optional = Some(false);
    add_on.measured_unit_id = Some(12345);
    add_on.add_on_type = Some(AddOnType::Usage);
    add_on.usage_type = Some(UsageType::PerUnit);
    add_on.unit_amount_in_cents.insert("USD".into(), 200);
    add_on.unit_amount_in_cents.insert("EUR".into(), 180);
    add_on
}

// ============================================================================
// AddOn Decode Tests
// ============================================================================

#[test]
fn test_add_on_decode_full_document() {
    let mut add_on = AddOn::default();
    add_on.from_xml_str(ADD_ON_XML).unwrap();

    assert_eq!(add_on.add_on_code, "ip");
    assert_eq!(add_on.name, "Extra IPs");
    assert_eq!(add_on.accounting_code, "acc-7");
    assert_eq!(add_on.default_quantity, 2);
    assert_eq!(add_on.display_quantity_on_hosted_page, Some(true));
    assert_eq!(add_on.optional, Some(false));
    assert_eq!(add_on.measured_unit_id, Some(12345));
    assert_eq!(add_on.add_on_type, Some(AddOnType::Usage));
    assert_eq!(add_on.usage_type, Some(UsageType::PerUnit));
    assert_eq!(add_on.tax_code.as_deref(), Some("digital"));
    assert_eq!(add_on.unit_amount_in_cents.get("USD"), Some(&200));
    assert_eq!(add_on.unit_amount_in_cents.get("EUR"), Some(&180));
    assert_eq!(
        add_on.created_at,
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
    );
    // offset timestamps normalize to UTC
    assert_eq!(
        add_on.updated_at,
        Some(Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap())
    );
}

#[test]
fn test_add_on_decode_ignores_unknown_elements() {
    let xml = "<add_on><foo>bar</foo><add_on_code>ip</add_on_code></add_on>";
    let mut add_on = AddOn::default();
    add_on.from_xml_str(xml).unwrap();
    assert_eq!(add_on.add_on_code, "ip");
}

#[test]
fn test_add_on_decode_absent_optionals_stay_unset() {
    let xml = "<add_on><add_on_code>ip</add_on_code><name>Extra IPs</name></add_on>";
    let mut add_on = AddOn::default();
    add_on.from_xml_str(xml).unwrap();

    assert_eq!(add_on.optional, None);
    assert_eq!(add_on.display_quantity_on_hosted_page, None);
    assert_eq!(add_on.measured_unit_id, None);
    assert_eq!(add_on.add_on_type, None);
    assert!(add_on.unit_amount_in_cents.is_empty());
}

#[test]
fn test_add_on_decode_repeated_currency_last_write_wins() {
    let xml = "<add_on><unit_amount_in_cents>\
               <USD>1000</USD><USD>1500</USD>\
               </unit_amount_in_cents></add_on>";
    let mut add_on = AddOn::default();
    add_on.from_xml_str(xml).unwrap();

    assert_eq!(add_on.unit_amount_in_cents.len(), 1);
    assert_eq!(add_on.unit_amount_in_cents.get("USD"), Some(&1500));
}

#[test]
fn test_add_on_decode_overwrites_entries_key_by_key() {
    let mut add_on = AddOn::default();
    add_on
        .from_xml_str(
            "<add_on><unit_amount_in_cents><USD>100</USD><EUR>90</EUR>\
             </unit_amount_in_cents></add_on>",
        )
        .unwrap();
    add_on
        .from_xml_str(
            "<add_on><unit_amount_in_cents><USD>150</USD>\
             </unit_amount_in_cents></add_on>",
        )
        .unwrap();

    assert_eq!(add_on.unit_amount_in_cents.get("USD"), Some(&150));
    assert_eq!(add_on.unit_amount_in_cents.get("EUR"), Some(&90));
}

#[test]
fn test_add_on_decode_truncated_stream_fails() {
    let xml = "<add_on><add_on_code>ip</add_on_code><name>Extra IPs</name>";
    let mut add_on = AddOn::default();
    let err = add_on.from_xml_str(xml).unwrap_err();
    assert!(matches!(err, Error::TruncatedStream { ref element } if element == "add_on"));
}

#[test]
fn test_add_on_decode_unknown_enum_value_fails() {
    let xml = "<add_on><add_on_type>metered</add_on_type></add_on>";
    let mut add_on = AddOn::default();
    let err = add_on.from_xml_str(xml).unwrap_err();
    assert!(matches!(err, Error::UnknownEnumVariant { ref value } if value == "metered"));
}

#[test]
fn test_add_on_decode_self_closing_document() {
    let mut add_on = AddOn::default();
    add_on.from_xml_str("<add_on/>").unwrap();
    assert_eq!(add_on, AddOn::default());
}

// ============================================================================
// AddOn Encode Tests
// ============================================================================

#[test]
fn test_add_on_encode_always_writes_required_fields() {
    let add_on = AddOn::new("gold", "ip", "Extra IPs");
    let xml = add_on.to_xml_string().unwrap();

    assert_eq!(
        xml,
        "<add_on><add_on_code>ip</add_on_code><name>Extra IPs</name>\
         <default_quantity>0</default_quantity>\
         <accounting_code></accounting_code></add_on>"
    );
}

#[test]
fn test_add_on_encode_omits_unset_optionals() {
    let add_on = AddOn::new("gold", "ip", "Extra IPs");
    let xml = add_on.to_xml_string().unwrap();

    assert!(!xml.contains("<optional>"));
    assert!(!xml.contains("<display_quantity_on_hosted_page>"));
    assert!(!xml.contains("<measured_unit_id>"));
    assert!(!xml.contains("<unit_amount_in_cents>"));
}

#[test]
fn test_add_on_encode_never_writes_server_fields() {
    let mut add_on = populated_add_on();
    add_on.tax_code = Some("digital".into());
    add_on.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
    add_on.updated_at = add_on.created_at;
    let xml = add_on.to_xml_string().unwrap();

    assert!(!xml.contains("<tax_code>"));
    assert!(!xml.contains("<created_at>"));
    assert!(!xml.contains("<updated_at>"));
}

#[test]
fn test_add_on_encode_enum_transport_form() {
    let add_on = populated_add_on();
    let xml = add_on.to_xml_string().unwrap();

    assert!(xml.contains("<add_on_type>usage</add_on_type>"));
    assert!(xml.contains("<usage_type>per_unit</usage_type>"));
}

#[test]
fn test_add_on_round_trip() {
    let original = populated_add_on();
    let xml = original.to_xml_string().unwrap();

    let mut decoded = AddOn::default();
    decoded.from_xml_str(&xml).unwrap();

    // plan_code never travels in the body; it lives in the URL
    decoded.plan_code = original.plan_code.clone();
    assert_eq!(decoded, original);
}

#[test]
fn test_add_on_round_trip_preserves_unset_optionals() {
    let mut original = AddOn::new("gold", "ip", "Extra IPs");
    original.accounting_code = "acc-7".into();
    let xml = original.to_xml_string().unwrap();

    let mut decoded = AddOn::default();
    decoded.from_xml_str(&xml).unwrap();

    assert_eq!(decoded.optional, None);
    assert_eq!(decoded.display_quantity_on_hosted_page, None);
    assert_eq!(decoded.measured_unit_id, None);
}

// ============================================================================
// Note Tests
// ============================================================================

#[test]
fn test_note_decode() {
    let xml = r#"<note>
        <account href="https://acme.ledgera.com/v2/accounts/ab%20c"/>
        <message>Payment was late</message>
        <created_at>2024-03-01T09:30:00Z</created_at>
    </note>"#;
    let mut note = Note::default();
    note.from_xml_str(xml).unwrap();

    assert_eq!(note.account_code.as_deref(), Some("ab c"));
    assert_eq!(note.message, "Payment was late");
    assert_eq!(
        note.created_at,
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
    );
}

#[test]
fn test_note_decode_account_without_href() {
    let xml = "<note><account/><message>hi</message></note>";
    let mut note = Note::default();
    note.from_xml_str(xml).unwrap();
    assert_eq!(note.account_code, None);
}

#[test]
fn test_note_encode_is_unsupported() {
    let mut note = Note::default();
    note.message = "Payment was late".into();

    let err = note.to_xml_string().unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation { .. }));

    // still unsupported with every field populated
    let xml = r#"<note><account href="https://x/accounts/a"/><message>m</message>
        <created_at>2024-03-01T09:30:00Z</created_at></note>"#;
    let mut note = Note::default();
    note.from_xml_str(xml).unwrap();
    assert!(matches!(
        note.to_xml_string().unwrap_err(),
        Error::UnsupportedOperation { .. }
    ));
}

// ============================================================================
// SubscriptionAddOn Tests
// ============================================================================

#[test]
fn test_subscription_add_on_new_defaults_quantity_to_one() {
    let line = SubscriptionAddOn::new("ip", 200);
    assert_eq!(line.quantity, 1);

    let line = SubscriptionAddOn::new("ip", 200).with_quantity(3);
    assert_eq!(line.quantity, 3);
}

#[test]
fn test_subscription_add_on_decode() {
    let xml = "<subscription_add_on><add_on_code>ip</add_on_code>\
               <quantity>3</quantity><unit_amount_in_cents>200</unit_amount_in_cents>\
               </subscription_add_on>";
    let mut line = SubscriptionAddOn::default();
    line.from_xml_str(xml).unwrap();

    assert_eq!(line.add_on_code, "ip");
    assert_eq!(line.quantity, 3);
    assert_eq!(line.unit_amount_in_cents, 200);
}

#[test]
fn test_subscription_add_on_decoded_quantity_is_not_defaulted() {
    // the quantity default applies to direct construction, not decoding
    let xml = "<subscription_add_on><add_on_code>ip</add_on_code></subscription_add_on>";
    let mut line = SubscriptionAddOn::default();
    line.from_xml_str(xml).unwrap();
    assert_eq!(line.quantity, 0);
}

#[test]
fn test_subscription_add_on_round_trip() {
    let original = SubscriptionAddOn::new("ip", 200).with_quantity(2);
    let xml = original.to_xml_string().unwrap();
    assert_eq!(
        xml,
        "<subscription_add_on><add_on_code>ip</add_on_code>\
         <quantity>2</quantity><unit_amount_in_cents>200</unit_amount_in_cents>\
         </subscription_add_on>"
    );

    let mut decoded = SubscriptionAddOn::default();
    decoded.from_xml_str(&xml).unwrap();
    assert_eq!(decoded, original);
}

// ============================================================================
// Plan Tests
// ============================================================================

#[test]
fn test_plan_decode() {
    let xml = "<plan><plan_code>gold</plan_code><name>Gold</name>\
               <description>All the things</description>\
               <unit_amount_in_cents><USD>1000</USD></unit_amount_in_cents>\
               <setup_fee_in_cents><USD>5000</USD><EUR>4500</EUR></setup_fee_in_cents>\
               </plan>";
    let mut plan = Plan::default();
    plan.from_xml_str(xml).unwrap();

    assert_eq!(plan.plan_code, "gold");
    assert_eq!(plan.name, "Gold");
    assert_eq!(plan.description.as_deref(), Some("All the things"));
    assert_eq!(plan.unit_amount_in_cents.get("USD"), Some(&1000));
    assert_eq!(plan.setup_fee_in_cents.get("EUR"), Some(&4500));
}

#[test]
fn test_plan_round_trip() {
    let mut plan = Plan {
        plan_code: "gold".into(),
        name: "Gold".into(),
        ..Plan::default()
    };
    plan.unit_amount_in_cents.insert("USD".into(), 1000);

    let xml = plan.to_xml_string().unwrap();
    let mut decoded = Plan::default();
    decoded.from_xml_str(&xml).unwrap();
    assert_eq!(decoded, plan);
}

// ============================================================================
// Resource Operation Tests
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct RecordedCall {
    method: Method,
    path: String,
    body: Option<String>,
}

/// Transport double recording every call and replaying a canned response
#[derive(Debug, Default)]
struct MockTransport {
    response: Option<String>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl MockTransport {
    fn respond_with(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            ..Self::default()
        }
    }

    fn single_call(&self) -> RecordedCall {
        let calls = self.calls.borrow();
        assert_eq!(calls.len(), 1);
        calls[0].clone()
    }
}

impl Transport for MockTransport {
    fn perform_request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<Option<String>> {
        self.calls.borrow_mut().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });
        Ok(self.response.clone())
    }
}

#[test]
fn test_add_on_create_posts_and_decodes_response() {
    let transport = MockTransport::respond_with(ADD_ON_XML);
    let mut add_on = AddOn::new("gold plan", "ip", "Extra IPs");
    add_on.create(&transport).unwrap();

    let call = transport.single_call();
    assert_eq!(call.method, Method::POST);
    assert_eq!(call.path, "/plans/gold%20plan/add_ons/");
    let body = call.body.unwrap();
    assert!(body.starts_with("<add_on>"));
    assert!(body.contains("<add_on_code>ip</add_on_code>"));

    // server-assigned fields came back
    assert!(add_on.created_at.is_some());
    assert_eq!(add_on.accounting_code, "acc-7");
}

#[test]
fn test_add_on_create_requires_plan_code() {
    let transport = MockTransport::default();
    let mut add_on = AddOn::new("", "ip", "Extra IPs");
    let err = add_on.create(&transport).unwrap_err();

    assert!(matches!(err, Error::MissingField { ref field } if field == "plan_code"));
    assert!(transport.calls.borrow().is_empty());
}

#[test]
fn test_add_on_create_without_response_body() {
    let transport = MockTransport::default();
    let mut add_on = AddOn::new("gold", "ip", "Extra IPs");
    add_on.create(&transport).unwrap();
    assert_eq!(add_on.created_at, None);
}

#[test]
fn test_add_on_update_puts_with_escaped_codes() {
    let transport = MockTransport::respond_with(ADD_ON_XML);
    let mut add_on = AddOn::new("gold", "ip/v4", "Extra IPs");
    add_on.update(&transport).unwrap();

    let call = transport.single_call();
    assert_eq!(call.method, Method::PUT);
    assert_eq!(call.path, "/plans/gold/add_ons/ip%2Fv4");
    assert!(call.body.is_some());
}

#[test]
fn test_add_on_update_requires_add_on_code() {
    let transport = MockTransport::default();
    let mut add_on = AddOn::new("gold", "", "Extra IPs");
    let err = add_on.update(&transport).unwrap_err();
    assert!(matches!(err, Error::MissingField { ref field } if field == "add_on_code"));
}

#[test]
fn test_add_on_delete_sends_no_body_and_keeps_local_state() {
    // even a response body is ignored on delete
    let transport = MockTransport::respond_with(ADD_ON_XML);
    let add_on = populated_add_on();
    let before = add_on.clone();
    add_on.delete(&transport).unwrap();

    let call = transport.single_call();
    assert_eq!(call.method, Method::DELETE);
    assert_eq!(call.path, "/plans/gold/add_ons/ip");
    assert_eq!(call.body, None);
    assert_eq!(add_on, before);
}

#[test]
fn test_add_on_operation_errors_propagate() {
    struct FailingTransport;
    impl Transport for FailingTransport {
        fn perform_request(
            &self,
            _method: Method,
            _path: &str,
            _body: Option<String>,
        ) -> Result<Option<String>> {
            Err(Error::http_status(422, "validation failed"))
        }
    }

    let mut add_on = AddOn::new("gold", "ip", "Extra IPs");
    let err = add_on.create(&FailingTransport).unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 422, .. }));
}
