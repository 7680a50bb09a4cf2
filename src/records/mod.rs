//! Input records supplied by the collection and inventory collaborators.

pub mod discogs;
mod lenient;
mod load;
mod models;

pub use load::{
    collection_from_value, inventory_from_value, load_collection_file, load_inventory_file,
    parse_collection_json, parse_inventory_json,
};
pub use models::{CollectionRecord, InventoryRecord};
