pub mod trade_report;
