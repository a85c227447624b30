use greetsheet_core::entries::{Row, CODE_FIELD, GREETING_FIELD, TIMESTAMP_FIELD};

/// Generates a small guest sheet for demo mode.
///
/// Rows are in sheet order, header first. One code is already redeemed and
/// one row stops before the greeting column.
pub fn demo_rows() -> Vec<Row> {
    let row = |cells: &[&str]| cells.iter().map(|c| c.to_string()).collect::<Row>();

    vec![
        row(&[TIMESTAMP_FIELD, CODE_FIELD, GREETING_FIELD]),
        row(&["", "anna42", "Liebe Anna, schön dass du dabei bist!"]),
        row(&["", "mueller7", "Hallo Familie Müller!"]),
        row(&["2021-06-12 14:03:11", "ben13", "Hey Ben!"]),
        row(&["", "gast"]),
    ]
}
