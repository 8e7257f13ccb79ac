pub mod resource_catalog;
