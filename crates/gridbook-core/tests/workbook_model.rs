use std::sync::Arc;

use gridbook_core::{
    encode_address, Address, BasicStyle, CellValue, ErrorKind, Range, ReferenceType, Workbook,
    MAX_COLUMN, MAX_ROW,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn copy_between_workbooks_reinterns_styles() {
    let mut source = Workbook::new();
    let sheet = source.current_worksheet_mut().unwrap();
    sheet.add_next_styled("bold", &BasicStyle::Bold.style()).unwrap();
    sheet.merge_range("B2:C3").unwrap();

    let mut target = Workbook::new();
    let bold = target.styles().intern(BasicStyle::Bold.style()).unwrap();
    let index = source.copy_worksheet_to(0, &mut target, "Sheet1", true).unwrap();

    assert_eq!(target.current_worksheet_index(), Some(0));
    let copy = target.worksheet(index).unwrap();
    assert_eq!(copy.name(), "Sheet2");
    assert_eq!(copy.merged_ranges().len(), 1);
    assert!(copy.styles().same_repository(target.styles()));

    let a1 = copy.cell("A1").unwrap().unwrap();
    assert!(Arc::ptr_eq(a1.style().unwrap(), &bold));
    assert_eq!(a1.value(), &CellValue::text("bold"));
}

#[test]
fn copy_within_workbook_is_independent() {
    let mut wb = Workbook::new();
    wb.current_worksheet_mut().unwrap().add_next(1).unwrap();
    let index = wb.copy_worksheet(0, "Copy", false).unwrap();

    wb.worksheet_mut(index).unwrap().add_at(2, 0, 0).unwrap();
    let original = wb.worksheet(0).unwrap().cell("A1").unwrap().unwrap();
    assert_eq!(original.value(), &CellValue::Integer(1));
    assert_eq!(wb.current_worksheet_index(), Some(0));
}

#[test]
fn removing_sheets_keeps_focus_valid() {
    let mut wb = Workbook::new();
    wb.add_worksheet("B", false).unwrap();
    wb.add_worksheet("C", false).unwrap();
    wb.set_selected_worksheet(2).unwrap();

    wb.remove_worksheet(2).unwrap();
    assert_eq!(wb.selected_worksheet(), 1);
    assert_eq!(wb.current_worksheet().unwrap().name(), "B");
    assert_eq!(wb.worksheet(1).unwrap().id(), 2);

    wb.remove_worksheet(0).unwrap();
    let err = wb.remove_worksheet(0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Worksheet);
}

#[test]
fn range_corners_are_normalized() {
    let range = Range::parse("B5:A1").unwrap();
    assert_eq!(range.start(), Address::parse("A1").unwrap());
    assert_eq!(range.end(), Address::parse("B5").unwrap());
}

fn reference_type() -> impl Strategy<Value = ReferenceType> {
    prop_oneof![
        Just(ReferenceType::Default),
        Just(ReferenceType::FixedColumn),
        Just(ReferenceType::FixedRow),
        Just(ReferenceType::FixedRowAndColumn),
    ]
}

proptest! {
    #[test]
    fn encoded_addresses_parse_back(
        column in 0..=MAX_COLUMN,
        row in 0..=MAX_ROW,
        reference in reference_type(),
    ) {
        let text = encode_address(column, row, reference).unwrap();
        let parsed = Address::parse(&text).unwrap();
        prop_assert_eq!(
            (parsed.column(), parsed.row(), parsed.reference_type()),
            (column, row, reference)
        );
    }

    #[test]
    fn column_letters_round_trip(column in 0..=MAX_COLUMN) {
        let letters = Address::column_to_letters(column).unwrap();
        prop_assert_eq!(Address::letters_to_column(&letters).unwrap(), column);
    }
}
