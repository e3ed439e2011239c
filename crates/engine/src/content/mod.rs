mod catalog_xml;
mod diagnostics;
mod mob_type_xml;
mod script_loader;
mod xml;

pub use catalog_xml::{load_catalog_file, parse_catalog_document};
pub use diagnostics::{
    ContentLoadError, ScriptDiagnostic, ScriptDiagnostics, ScriptErrorCode, SourceLocation,
};
pub use mob_type_xml::{
    default_type_info, load_mob_type_file, parse_mob_type_document, EventDef, MobTypeDocument,
    ScriptDef, ScriptLine, StateDef,
};
pub use script_loader::load_script;
pub use xml::collect_xml_files_sorted;
