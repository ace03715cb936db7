//! End-to-end workbook scenarios

use std::sync::Arc;

use gridbook::prelude::*;
use gridbook::{units, SheetProtectionValue, WorkbookProtection};
use pretty_assertions::assert_eq;

#[test]
fn cursor_writes_then_merge_resolution() {
    let mut workbook = Workbook::empty();
    let index = workbook.add_worksheet("Sheet1", false).unwrap();
    let sheet = workbook.worksheet_mut(index).unwrap();
    sheet.set_cell_direction(CellDirection::ColumnToColumn);

    sheet.add_next(42).unwrap();
    sheet.add_next("x").unwrap();
    assert_eq!((sheet.current_column(), sheet.current_row()), (2, 0));

    sheet.merge_range("A2:B2").unwrap();
    assert!(sheet.cell("B2").unwrap().is_none());
    sheet.resolve_merges().unwrap();

    let b2 = sheet.cell("B2").unwrap().unwrap();
    assert_eq!(b2.cell_type(), CellType::Empty);
    let marker = sheet.styles().intern(BasicStyle::MergeCell.style()).unwrap();
    assert!(Arc::ptr_eq(b2.style().unwrap(), &marker));

    let a1 = sheet.cell("A1").unwrap().unwrap();
    assert_eq!(a1.value(), &CellValue::Integer(42));
}

#[test]
fn sheet_name_collision() {
    let mut workbook = Workbook::new();
    let index = workbook.add_worksheet("Sheet1", true).unwrap();
    assert_eq!(workbook.worksheet(index).unwrap().name(), "Sheet2");

    let err = workbook.add_worksheet("sheet1", false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Worksheet);
    assert_eq!(workbook.sheet_count(), 2);
}

#[test]
fn styles_are_shared_across_sheets() {
    let mut workbook = Workbook::new();
    workbook.add_worksheet("Second", false).unwrap();

    let mut red = Style::default();
    red.font.color = Color::parse_argb("FF0000").unwrap();

    for index in 0..2 {
        let sheet = workbook.worksheet_mut(index).unwrap();
        sheet.add_next_styled("red", &red.clone()).unwrap();
    }

    let first = workbook.worksheet(0).unwrap().cell("A1").unwrap().unwrap();
    let second = workbook.worksheet(1).unwrap().cell("A1").unwrap().unwrap();
    assert!(Arc::ptr_eq(first.style().unwrap(), second.style().unwrap()));

    // A separate workbook keeps its own instances
    let mut other = Workbook::new();
    let sheet = other.current_worksheet_mut().unwrap();
    sheet.add_next_styled("red", &red).unwrap();
    let foreign = sheet.cell("A1").unwrap().unwrap();
    assert!(!Arc::ptr_eq(first.style().unwrap(), foreign.style().unwrap()));
    assert_eq!(first.style().unwrap().as_ref(), foreign.style().unwrap().as_ref());
}

#[test]
fn merge_overlap_is_rejected() {
    let mut workbook = Workbook::new();
    let sheet = workbook.current_worksheet_mut().unwrap();
    sheet.merge_range("A1:B2").unwrap();

    let err = sheet.merge(Range::parse("B2:C3").unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(sheet.merged_ranges().len(), 1);
}

#[test]
fn auto_filter_keeps_default_columns() {
    let mut workbook = Workbook::new();
    let sheet = workbook.current_worksheet_mut().unwrap();
    sheet.add_at("head", 0, 0).unwrap();
    sheet.add_at(1, 0, 3).unwrap();

    sheet.set_column_width(4, 12.0).unwrap();
    sheet.set_column_width(4, sheet.default_column_width()).unwrap();
    sheet.set_auto_filter(0, 1).unwrap();
    sheet.recalculate_columns();

    assert!(sheet.column(4).is_none());
    assert!(sheet.column(0).is_some());
    assert!(sheet.column(1).is_some());
    assert_eq!(sheet.auto_filter().unwrap().to_string(), "A1:B4");

    sheet.remove_auto_filter();
    assert!(sheet.columns().is_empty());
}

#[test]
fn shortener_follows_current_sheet() {
    let mut workbook = Workbook::new();
    workbook.add_worksheet("Totals", false).unwrap();

    let mut s = workbook.shortener();
    s.set_worksheet("Sheet1").unwrap();
    s.value("a").unwrap();
    s.down().unwrap();
    s.value("b").unwrap();
    s.set_worksheet("Totals").unwrap();
    s.formula("=COUNTA(Sheet1!A:A)").unwrap();

    let first = workbook.worksheet(0).unwrap();
    assert_eq!(first.cell("A2").unwrap().unwrap().value(), &CellValue::text("b"));
    let totals = workbook.worksheet(1).unwrap();
    assert_eq!(
        totals.cell("A1").unwrap().unwrap().formula_text(),
        Some("COUNTA(Sheet1!A:A)")
    );
}

#[test]
fn dates_carry_the_date_style() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut workbook = Workbook::new();
    let sheet = workbook.current_worksheet_mut().unwrap();
    sheet.add_next(date).unwrap();

    let cell = sheet.cell("A1").unwrap().unwrap();
    assert_eq!(cell.cell_type(), CellType::Date);
    assert!(cell.style().unwrap().number_format.is_date_format());
    assert_eq!(units::date_from_oa(units::oa_date(date).unwrap()).unwrap(), date);
}

#[test]
fn prepare_for_encoding_finalizes_every_sheet() {
    let mut workbook = Workbook::new();
    workbook.set_workbook_protection(false, true, "secret");
    let sheet = workbook.current_worksheet_mut().unwrap();
    sheet.add_next_styled("merged", &BasicStyle::Bold.style()).unwrap();
    sheet.merge_range("A1:C1").unwrap();
    sheet.add_allowed_action(SheetProtectionValue::Sort);

    let table = StyleTable::prepare(&mut workbook).unwrap();
    let sheet = workbook.worksheet(0).unwrap();
    for address in ["B1", "C1"] {
        let cell = sheet.cell(address).unwrap().unwrap();
        assert_eq!(cell.cell_type(), CellType::Empty);
        assert!(table.cell_style_index(cell).is_some());
    }
    assert_eq!(table.len(), workbook.styles().len().unwrap());

    let protection: &WorkbookProtection = workbook.protection();
    assert!(protection.lock_structure);
    assert!(protection.password_hash.is_some());
}

#[test]
fn hidden_selected_sheet_is_invalid() {
    let mut workbook = Workbook::new();
    workbook.add_worksheet("Other", false).unwrap();

    let err = workbook.set_worksheet_hidden(0, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Worksheet);

    workbook.set_selected_worksheet(1).unwrap();
    workbook.set_worksheet_hidden(0, true).unwrap();
    assert!(workbook.worksheet(0).unwrap().is_hidden());

    let err = workbook.set_worksheet_hidden(1, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Worksheet);
}
