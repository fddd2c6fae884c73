pub mod static_catalog;
