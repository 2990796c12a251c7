//! # Text Rendering
//!
//! Plain-text views of the application state.
//!
//! ## Product Table
//! ```text
//! == Product Management ==
//! Track all your products in one place
//!
//! ID  Name    Price   Currency  Stock  Safe  Category  Supplier  Restock
//! --  ------  ------  --------  -----  ----  --------  --------  -------
//! 1   Widget  $19.50  USD       2      10    Tools     Acme      LOW
//! 2   Bolt    €0.25   EUR       500    100   N/A       N/A
//! ```

use stockroom_client::{Application, FormView, Notice, NoticeKind};
use stockroom_core::{
    CategoryRow, CurrencyTable, DashboardSummary, FormMode, Header, ProductRow, Section,
    SupplierRow,
};

const LOW_STOCK_FLAG: &str = "LOW";

/// Left-aligned columns separated by two spaces.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = vec![
        table_line(headers.iter().copied(), &widths),
        table_line(rule.iter().map(String::as_str), &widths),
    ];
    out.extend(
        rows.iter()
            .map(|row| table_line(row.iter().map(String::as_str), &widths)),
    );
    out.join("\n") + "\n"
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    padded.join("  ").trim_end().to_string()
}

pub fn header(header: &Header) -> String {
    format!("== {} ==\n{}\n", header.title, header.subtitle)
}

pub fn notice(notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Success => format!("[ok] {}", notice.message),
        NoticeKind::Error => format!("[error] {}", notice.message),
    }
}

pub fn dashboard(summary: Option<&DashboardSummary>) -> String {
    let Some(summary) = summary else {
        return "Summary not loaded.\n".to_string();
    };
    let rows = [
        ("Employees", summary.employee_count),
        ("Categories", summary.category_count),
        ("Suppliers", summary.supplier_count),
        ("Products", summary.product_count),
        ("Needs restock", summary.restock_count),
    ];
    rows.iter()
        .map(|(label, count)| format!("{label:<14} {count}\n"))
        .collect()
}

pub fn suppliers(rows: &[SupplierRow]) -> String {
    if rows.is_empty() {
        return "No suppliers yet.\n".to_string();
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.contact_person.clone(),
                r.phone.clone(),
                r.email.clone(),
            ]
        })
        .collect();
    table(&["ID", "Name", "Contact", "Phone", "Email"], &cells)
}

pub fn categories(rows: &[CategoryRow]) -> String {
    if rows.is_empty() {
        return "No categories yet.\n".to_string();
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![r.id.to_string(), r.name.clone(), r.description.clone()])
        .collect();
    table(&["ID", "Name", "Description"], &cells)
}

/// Products with the rows below their safe stock flagged.
pub fn products(rows: &[ProductRow]) -> String {
    if rows.is_empty() {
        return "No products yet.\n".to_string();
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.price.clone(),
                r.currency_code.clone(),
                r.stock.to_string(),
                r.safe_stock.to_string(),
                r.category.clone(),
                r.supplier.clone(),
                if r.low_stock { LOW_STOCK_FLAG } else { "" }.to_string(),
            ]
        })
        .collect();
    table(
        &[
            "ID", "Name", "Price", "Currency", "Stock", "Safe", "Category", "Supplier",
            "Restock",
        ],
        &cells,
    )
}

pub fn form(view: &FormView) -> String {
    let state = match view.mode {
        FormMode::Create => "new".to_string(),
        FormMode::Edit(id) => format!("editing #{id}"),
    };
    let mut out = format!("{} ({state})\n", view.submit_label);
    let width = view
        .fields
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    for (name, value) in &view.fields {
        out.push_str(&format!("  {name:<width$}  {value}\n"));
    }
    out
}

pub fn currencies(table: &CurrencyTable) -> String {
    table
        .sorted_for_display()
        .iter()
        .map(|c| format!("{}\n", c.option_label()))
        .collect()
}

/// Header and body of the current section.
pub fn section(app: &Application) -> String {
    let body = match app.current_section() {
        Section::Dashboard => dashboard(app.summary().as_ref()),
        Section::Suppliers => suppliers(&app.supplier_rows()),
        Section::Categories => categories(&app.category_rows()),
        Section::Products => products(&app.product_rows()),
    };
    format!("{}\n{body}", header(&app.header()))
}
