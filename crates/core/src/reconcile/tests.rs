//! Scenario tests for the reconciler.

use chrono::NaiveDate;
use fluxo_shared::DateWindow;
use fluxo_shared::types::{CategoryId, ProjectId};
use rust_decimal_macros::dec;

use super::service::Reconciler;
use super::types::{
    Category, Invoice, JoinDepth, LineItem, Movement, NOT_AVAILABLE, PaymentStatus, Project,
    ReconcileInput, ReconcileOptions,
};
use super::views::ViewKind;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn window(start: &str, end: &str) -> DateWindow {
    DateWindow::new(d(start), d(end)).unwrap()
}

fn march() -> DateWindow {
    window("2024-03-01", "2024-03-31")
}

fn paid_movement() -> Movement {
    Movement {
        is_paid: true,
        payment_date: Some(d("2024-03-05")),
        due_date: Some(d("2024-03-01")),
        issue_date: Some(d("2024-02-20")),
        net_amount: Some(dec!(100)),
        ..Movement::new(1)
    }
}

fn movements(movements: Vec<Movement>) -> ReconcileInput {
    ReconcileInput {
        movements,
        ..ReconcileInput::default()
    }
}

fn invoice(key: &str, number: &str, supplier: &str) -> Invoice {
    Invoice {
        invoice_key: key.to_string(),
        invoice_number: Some(number.to_string()),
        supplier_name: Some(supplier.to_string()),
        category: Some("Materiais".to_string()),
        project_id: Some(ProjectId::new(7)),
        ..Invoice::default()
    }
}

fn item(key: &str, sequence: u32, value: rust_decimal::Decimal) -> LineItem {
    LineItem {
        invoice_key: key.to_string(),
        sequence: Some(sequence),
        description: Some(format!("item {sequence}")),
        value: Some(value),
    }
}

#[test]
fn paid_movement_counts_on_payment_date() {
    let rows = Reconciler::reconcile(
        &ReconcileOptions::new(march()),
        &movements(vec![paid_movement()]),
    );

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].effective_date, d("2024-03-05"));
    assert_eq!(rows[0].amount, dec!(100));
    assert_eq!(rows[0].status, PaymentStatus::Paid);
}

#[test]
fn paid_movement_excluded_from_issue_month() {
    let rows = Reconciler::reconcile(
        &ReconcileOptions::new(window("2024-02-01", "2024-02-28")),
        &movements(vec![paid_movement()]),
    );

    assert!(rows.is_empty());
}

#[test]
fn movement_without_dates_is_never_selected() {
    let rows = Reconciler::reconcile(
        &ReconcileOptions::new(march()),
        &movements(vec![Movement::new(3)]),
    );

    assert!(rows.is_empty());
}

#[test]
fn unlinked_movement_gets_placeholders() {
    let movement = Movement {
        description: Some("Tarifa bancaria".to_string()),
        installment: Some("1/1".to_string()),
        ..paid_movement()
    };
    let rows = Reconciler::reconcile(&ReconcileOptions::new(march()), &movements(vec![movement]));

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.name, "Tarifa bancaria");
    assert_eq!(row.category, NOT_AVAILABLE);
    assert_eq!(row.invoice_number, NOT_AVAILABLE);
    assert_eq!(row.project, NOT_AVAILABLE);
    assert_eq!(row.installment, "1/1");
    assert_eq!(row.line_sequence, None);
}

#[test]
fn amount_prefers_original_over_paid() {
    let movement = Movement {
        net_amount: None,
        original_amount: Some(dec!(150)),
        paid_amount: Some(dec!(200)),
        ..paid_movement()
    };
    let rows = Reconciler::reconcile(&ReconcileOptions::new(march()), &movements(vec![movement]));

    assert_eq!(rows[0].amount, dec!(150));
}

#[test]
fn amount_defaults_to_zero() {
    let movement = Movement {
        net_amount: None,
        ..paid_movement()
    };
    let rows = Reconciler::reconcile(&ReconcileOptions::new(march()), &movements(vec![movement]));

    assert_eq!(rows[0].amount, dec!(0));
}

#[test]
fn exclude_keyword_drops_row() {
    let movement = Movement {
        description: Some("Reembolso de despesas".to_string()),
        ..paid_movement()
    };
    let options = ReconcileOptions::new(march()).with_keywords(&[] as &[&str], &["reembolso"]);
    let rows = Reconciler::reconcile(&options, &movements(vec![movement]));

    assert!(rows.is_empty());
}

#[test]
fn include_keyword_keeps_only_matches() {
    let wanted = Movement {
        description: Some("Aluguel escritorio".to_string()),
        ..paid_movement()
    };
    let other = Movement {
        description: Some("Energia".to_string()),
        is_paid: true,
        payment_date: Some(d("2024-03-10")),
        ..Movement::new(2)
    };
    let options = ReconcileOptions::new(march()).with_keywords(&["ALUGUEL"], &[]);
    let rows = Reconciler::reconcile(&options, &movements(vec![wanted, other]));

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].movement_id.into_inner(), 1);
}

#[test]
fn exclude_keyword_matches_header_supplier() {
    let movement = Movement {
        invoice_key: Some("K1".to_string()),
        ..paid_movement()
    };
    let input = ReconcileInput {
        movements: vec![movement],
        invoices: vec![invoice("K1", "123", "Posto Reembolso Ltda")],
        ..ReconcileInput::default()
    };
    let options = ReconcileOptions::new(march()).with_keywords(&[] as &[&str], &["reembolso"]);

    assert!(Reconciler::reconcile(&options, &input).is_empty());
}

#[test]
fn header_join_fills_invoice_fields() {
    let movement = Movement {
        invoice_key: Some("K1".to_string()),
        ..paid_movement()
    };
    let input = ReconcileInput {
        movements: vec![movement],
        invoices: vec![invoice("K1", "000123", "Acme Ltda")],
        projects: vec![Project {
            id: ProjectId::new(7),
            name: "Obra Centro".to_string(),
        }],
        ..ReconcileInput::default()
    };
    let rows = Reconciler::reconcile(&ReconcileOptions::new(march()), &input);

    assert_eq!(rows[0].name, "Acme Ltda");
    assert_eq!(rows[0].invoice_number, "000123");
    assert_eq!(rows[0].category, "Materiais");
    assert_eq!(rows[0].project, "Obra Centro");
}

#[test]
fn category_lookup_wins_over_header_category() {
    let movement = Movement {
        invoice_key: Some("K1".to_string()),
        category_id: Some(CategoryId::new(4)),
        ..paid_movement()
    };
    let input = ReconcileInput {
        movements: vec![movement],
        invoices: vec![invoice("K1", "1", "Acme")],
        categories: vec![Category {
            id: CategoryId::new(4),
            description: "Combustivel".to_string(),
        }],
        ..ReconcileInput::default()
    };
    let rows = Reconciler::reconcile(&ReconcileOptions::new(march()), &input);

    assert_eq!(rows[0].category, "Combustivel");
}

#[test]
fn join_none_ignores_headers() {
    let movement = Movement {
        invoice_key: Some("K1".to_string()),
        ..paid_movement()
    };
    let input = ReconcileInput {
        movements: vec![movement],
        invoices: vec![invoice("K1", "000123", "Acme Ltda")],
        ..ReconcileInput::default()
    };
    let options = ReconcileOptions::new(march()).with_join(JoinDepth::None);
    let rows = Reconciler::reconcile(&options, &input);

    assert_eq!(rows[0].invoice_number, NOT_AVAILABLE);
    assert_eq!(rows[0].name, "1");
}

#[test]
fn display_name_prefers_title() {
    let movement = Movement {
        title: Some("Folha marco".to_string()),
        supplier_name: Some("Fulano".to_string()),
        ..paid_movement()
    };
    let rows = Reconciler::reconcile(&ReconcileOptions::new(march()), &movements(vec![movement]));

    assert_eq!(rows[0].name, "Folha marco");
}

#[test]
fn blank_title_falls_through() {
    let movement = Movement {
        title: Some("   ".to_string()),
        supplier_name: Some("Fulano".to_string()),
        ..paid_movement()
    };
    let rows = Reconciler::reconcile(&ReconcileOptions::new(march()), &movements(vec![movement]));

    assert_eq!(rows[0].name, "Fulano");
}

#[test]
fn payment_type_filter_is_case_insensitive() {
    let salary = Movement {
        payment_type: Some("sal".to_string()),
        ..paid_movement()
    };
    let invoice = Movement {
        payment_type: Some("NFE".to_string()),
        ..Movement {
            id: fluxo_shared::types::MovementId::new(2),
            ..paid_movement()
        }
    };
    let untyped = Movement {
        id: fluxo_shared::types::MovementId::new(3),
        ..paid_movement()
    };
    let rows = Reconciler::reconcile(
        &ViewKind::Payroll.options(march()),
        &movements(vec![salary, invoice, untyped]),
    );

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].payment_type.as_deref(), Some("SAL"));
}

#[test]
fn project_filter_matches_movement_project() {
    let inside = Movement {
        project_id: Some(ProjectId::new(7)),
        ..paid_movement()
    };
    let outside = Movement {
        id: fluxo_shared::types::MovementId::new(2),
        project_id: Some(ProjectId::new(8)),
        ..paid_movement()
    };
    let options = ReconcileOptions::new(march()).with_project(Some(ProjectId::new(7)));
    let rows = Reconciler::reconcile(&options, &movements(vec![inside, outside]));

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].movement_id.into_inner(), 1);
}

#[test]
fn project_filter_matches_invoice_project() {
    let movement = Movement {
        invoice_key: Some("K1".to_string()),
        ..paid_movement()
    };
    let input = ReconcileInput {
        movements: vec![movement],
        invoices: vec![invoice("K1", "55", "Acme")],
        projects: vec![Project {
            id: ProjectId::new(7),
            name: "Obra Centro".to_string(),
        }],
        ..ReconcileInput::default()
    };

    let matching = ReconcileOptions::new(march()).with_project(Some(ProjectId::new(7)));
    let rows = Reconciler::reconcile(&matching, &input);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].project, "Obra Centro");

    let other = ReconcileOptions::new(march()).with_project(Some(ProjectId::new(8)));
    assert!(Reconciler::reconcile(&other, &input).is_empty());
}

#[test]
fn line_items_change_row_grain() {
    let first = Movement {
        invoice_key: Some("K1".to_string()),
        payment_type: Some("NFE".to_string()),
        installment: Some("1/2".to_string()),
        ..paid_movement()
    };
    let second = Movement {
        id: fluxo_shared::types::MovementId::new(2),
        is_paid: false,
        due_date: Some(d("2024-03-20")),
        installment: Some("2/2".to_string()),
        ..first.clone()
    };
    let orphan = Movement {
        id: fluxo_shared::types::MovementId::new(3),
        invoice_key: Some("K9".to_string()),
        ..first.clone()
    };
    let input = ReconcileInput {
        movements: vec![first, second, orphan],
        invoices: vec![invoice("K1", "55", "Acme"), invoice("K9", "99", "Nobody")],
        line_items: vec![item("K1", 2, dec!(30)), item("K1", 1, dec!(70))],
        ..ReconcileInput::default()
    };
    let rows = Reconciler::reconcile(&ViewKind::NfeDetail.options(march()), &input);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].line_sequence, Some(1));
    assert_eq!(rows[0].amount, dec!(70));
    assert_eq!(rows[0].description.as_deref(), Some("item 1"));
    assert_eq!(rows[1].line_sequence, Some(2));
    assert_eq!(rows[1].amount, dec!(30));
    assert!(rows.iter().all(|r| r.status == PaymentStatus::Open));
    assert!(rows.iter().all(|r| r.installment == "1/2"));
    assert!(rows.iter().all(|r| r.invoice_number == "55"));
}

#[test]
fn line_items_drop_movements_without_header() {
    let movement = Movement {
        invoice_key: Some("K1".to_string()),
        payment_type: Some("NFE".to_string()),
        ..paid_movement()
    };
    let input = ReconcileInput {
        movements: vec![movement],
        line_items: vec![item("K1", 1, dec!(10))],
        ..ReconcileInput::default()
    };

    assert!(Reconciler::reconcile(&ViewKind::NfeDetail.options(march()), &input).is_empty());
}

#[test]
fn line_items_status_paid_when_all_paid() {
    let movement = Movement {
        invoice_key: Some("K1".to_string()),
        payment_type: Some("NFE".to_string()),
        ..paid_movement()
    };
    let input = ReconcileInput {
        movements: vec![movement],
        invoices: vec![invoice("K1", "1", "Acme")],
        line_items: vec![item("K1", 1, dec!(10))],
        ..ReconcileInput::default()
    };
    let rows = Reconciler::reconcile(&ViewKind::NfeDetail.options(march()), &input);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, PaymentStatus::Paid);
}

#[test]
fn invoice_key_restriction() {
    let a = Movement {
        invoice_key: Some("K1".to_string()),
        ..paid_movement()
    };
    let b = Movement {
        id: fluxo_shared::types::MovementId::new(2),
        invoice_key: Some("K2".to_string()),
        ..paid_movement()
    };
    let options = ReconcileOptions::new(march()).with_invoice_key(Some(" K2 ".to_string()));
    let rows = Reconciler::reconcile(&options, &movements(vec![a, b]));

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].movement_id.into_inner(), 2);
}

#[test]
fn output_keeps_input_order() {
    let later = Movement {
        payment_date: Some(d("2024-03-28")),
        ..paid_movement()
    };
    let earlier = Movement {
        id: fluxo_shared::types::MovementId::new(2),
        payment_date: Some(d("2024-03-02")),
        ..paid_movement()
    };
    let rows = Reconciler::reconcile(
        &ReconcileOptions::new(march()),
        &movements(vec![later, earlier]),
    );

    let ids: Vec<i64> = rows.iter().map(|r| r.movement_id.into_inner()).collect();
    assert_eq!(ids, vec![1, 2]);
}
