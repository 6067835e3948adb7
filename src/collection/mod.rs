pub mod builder;
pub mod script;
pub mod types;
pub mod url;

pub use builder::{CollectionBuilder, ConvertOptions};
pub use script::{EXTRACTION_RULES, ExtractionRule, ResponseExtractor};
pub use types::{
    Body, Collection, Event, FolderItem, Header, Info, Item, QueryParam, Request, RequestItem,
    SCHEMA_URL, Script, Url, Variable,
};
