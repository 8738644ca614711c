pub mod dax_explorer;
pub mod home;
pub mod lineage_view;
pub mod not_found;
pub mod table_view;
