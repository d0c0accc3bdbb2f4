pub mod components;
pub mod header_form;
pub mod invoice_screen;
pub mod line_form;
pub mod lines_table;
