//! Pre-generation checks on a resolved driver.
//!
//! Resolution guarantees the shape of the schema. These checks guarantee the
//! names: everything spliced into C++ as an identifier must be one, and no
//! two nodes may produce the same type name. Running them before emission
//! keeps C++ compiler errors out of generated headers.
//!
//! ## Validation Checks
//!
//! - **Identifiers**: member names, struct and class names, `interface`,
//!   `call_back` and namespace segments
//! - **Hooks**: a `call_back` may not reuse a member name of its client class
//! - **Includes**: `ROOT.includes` entries fit in an `#include "..."` line
//! - **Type name collisions**: records, sequence elements and classes
//! - **Root entries**: `ROOT.data` entries are records, and every class works
//!   on one of them

use std::collections::HashMap;

use restdrv_define::{MethodKind, UrlCategory};
use tracing::debug;

use crate::codegen::crud::method_name;
use crate::errors::GeneratorError;
use crate::model::{
    Class, Driver, Field, FieldKind, Record, ScalarKind, Sequence, SequenceKind, UrlClass,
    url_function,
};
use crate::naming::{is_identifier, is_qualified_identifier};
use crate::walker::{FieldVisitor, walk};

/// Validates a driver before code generation.
///
/// ## Examples
///
/// ```
/// use restdrv_define::Schema;
/// use restdrv_gen::classes::resolve_driver;
/// use restdrv_gen::validation::validate_driver;
///
/// let schema = Schema::parse(
///     "demo",
///     "[ROOT]\ndata = foo\n\n[foo]\ntype = object\nmembers = class\n\n[class]\ntype = int\n",
/// )
/// .unwrap();
/// let driver = resolve_driver(&schema).unwrap();
///
/// // `class_` is a fine member name
/// assert!(validate_driver(&driver).is_ok());
/// ```
///
/// ## Errors
///
/// - `GeneratorError::InvalidIdentifier` for a name that is not a C++ identifier;
/// - `GeneratorError::InvalidAttribute` for a `call_back` clashing with a
///   generated member, or an include that cannot be spliced;
/// - `GeneratorError::StructNameCollision` when two nodes share a type name;
/// - `GeneratorError::UnexpectedKind` for a `ROOT.data` entry that is not a record;
/// - `GeneratorError::UndeclaredRecord` for a class record missing from `ROOT.data`.
pub fn validate_driver(driver: &Driver) -> Result<(), GeneratorError> {
    if !is_qualified_identifier(&driver.namespace) {
        return Err(GeneratorError::InvalidIdentifier {
            node: "ROOT".to_string(),
            value: driver.namespace.clone(),
        });
    }

    for include in &driver.includes {
        if include.is_empty() || include.contains(['"', '\n', '\\']) {
            return Err(GeneratorError::InvalidAttribute {
                node: "ROOT".to_string(),
                attribute: "includes".to_string(),
                reason: format!("'{}' cannot appear in an #include line", include),
            });
        }
    }

    for field in &driver.records {
        if field.as_record().is_none() {
            return Err(GeneratorError::UnexpectedKind {
                node: field.name.clone(),
                expected: "an object or struct".to_string(),
                found: tag_name(field).to_string(),
            });
        }
    }

    let mut names = NameCheck::default();
    for field in &driver.records {
        walk(field, &mut names, &mut ());
    }
    if let Some(err) = names.error {
        return Err(err);
    }

    for class in &driver.classes {
        check_class(class, driver, &mut names.owners)?;
    }

    debug!(
        "Validated {} type names across {} records",
        names.owners.len(),
        driver.records.len()
    );
    Ok(())
}

fn check_class(
    class: &Class,
    driver: &Driver,
    owners: &mut HashMap<String, String>,
) -> Result<(), GeneratorError> {
    claim(owners, class.class_name(), class.node())?;

    let data = match class {
        Class::Parse(parse) => &parse.data,
        Class::Url(url) => {
            if let Some(base) = &url.interface {
                identifier(&url.node, base, true)?;
            }
            for method in &url.methods {
                if let Some(hook) = &method.call_back {
                    identifier(&method.node, hook, false)?;
                    check_hook(url, &method.node, hook)?;
                }
            }
            &url.data
        }
    };

    if driver.record(data).is_none() {
        return Err(GeneratorError::UndeclaredRecord {
            class: class.node().to_string(),
            record: data.clone(),
        });
    }
    Ok(())
}

/// Names the generated client class declares itself.
fn client_members(class: &UrlClass) -> Vec<&str> {
    let mut members: Vec<&str> = [
        MethodKind::Post,
        MethodKind::Put,
        MethodKind::Delete,
        MethodKind::Get,
        MethodKind::Read,
        MethodKind::Validate,
    ]
    .into_iter()
    .map(method_name)
    .collect();
    members.extend([
        url_function(UrlCategory::Read),
        url_function(UrlCategory::Cud),
        "transport_",
        class.class_name.as_str(),
    ]);
    members
}

fn check_hook(class: &UrlClass, node: &str, hook: &str) -> Result<(), GeneratorError> {
    if client_members(class).contains(&hook) {
        return Err(GeneratorError::InvalidAttribute {
            node: node.to_string(),
            attribute: "call_back".to_string(),
            reason: format!("'{}' is a member of {}", hook, class.class_name),
        });
    }
    Ok(())
}

fn identifier(node: &str, value: &str, qualified: bool) -> Result<(), GeneratorError> {
    let valid = if qualified {
        is_qualified_identifier(value)
    } else {
        is_identifier(value)
    };
    if valid {
        Ok(())
    } else {
        Err(GeneratorError::InvalidIdentifier {
            node: node.to_string(),
            value: value.to_string(),
        })
    }
}

/// Records `node` as the producer of type `name`.
fn claim(
    owners: &mut HashMap<String, String>,
    name: &str,
    node: &str,
) -> Result<(), GeneratorError> {
    identifier(node, name, false)?;
    match owners.get(name) {
        Some(first) if first != node => Err(GeneratorError::StructNameCollision {
            name: name.to_string(),
            first: first.clone(),
            second: node.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            owners.insert(name.to_string(), node.to_string());
            Ok(())
        }
    }
}

fn tag_name(field: &Field) -> &'static str {
    match &field.kind {
        FieldKind::Scalar(ScalarKind::String) => "string",
        FieldKind::Scalar(ScalarKind::Int) => "int",
        FieldKind::Scalar(ScalarKind::Bool) => "bool",
        FieldKind::Record(_) => "object",
        FieldKind::Sequence(Sequence {
            tag: SequenceKind::Array,
            ..
        }) => "array",
        FieldKind::Sequence(_) => "list",
    }
}

/// Collects type names and stops at the first bad name.
#[derive(Default)]
struct NameCheck {
    /// Type name to the node that produced it.
    owners: HashMap<String, String>,
    error: Option<GeneratorError>,
}

impl NameCheck {
    fn member(&mut self, field: &Field) -> bool {
        if self.error.is_some() {
            return false;
        }
        if let Err(err) = identifier(&field.name, &field.cpp_member(), false) {
            self.error = Some(err);
            return false;
        }
        true
    }

    fn type_name(&mut self, field: &Field, name: &str) -> Option<()> {
        if !self.member(field) {
            return None;
        }
        match claim(&mut self.owners, name, &field.name) {
            Ok(()) => Some(()),
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

impl<'t> FieldVisitor<'t> for NameCheck {
    type Scope = ();

    fn scalar(&mut self, field: &'t Field, _kind: ScalarKind, _scope: &mut ()) {
        self.member(field);
    }

    fn enter_record(&mut self, field: &'t Field, record: &'t Record, _scope: &mut ()) -> Option<()> {
        self.type_name(field, &record.struct_name)
    }

    fn enter_sequence(
        &mut self,
        field: &'t Field,
        sequence: &'t Sequence,
        _scope: &mut (),
    ) -> Option<()> {
        self.type_name(field, &sequence.element.struct_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::resolve_driver;
    use crate::test_utils::{SIMPLE_SCHEMA, schema_from};

    fn driver_for(text: &str) -> Driver {
        resolve_driver(&schema_from(text)).unwrap()
    }

    #[test]
    fn fixture_passes() {
        assert!(validate_driver(&driver_for(SIMPLE_SCHEMA)).is_ok());
    }

    // === identifier checks ===

    #[test]
    fn dashed_member_name_is_rejected() {
        let driver = driver_for("[ROOT]\ndata = r\n[r]\ntype = object\nmembers = bad-name\n[bad-name]\ntype = int\n");
        match validate_driver(&driver) {
            Err(GeneratorError::InvalidIdentifier { node, value }) => {
                assert_eq!(node, "bad-name");
                assert_eq!(value, "bad-name_");
            }
            other => panic!("Expected InvalidIdentifier, got: {:?}", other),
        }
    }

    #[test]
    fn bad_struct_name_is_rejected() {
        let driver = driver_for("[ROOT]\ndata = r\n[r]\ntype = object\nstruct_name = Not Valid\nmembers = a\n[a]\ntype = int\n");
        assert!(matches!(
            validate_driver(&driver),
            Err(GeneratorError::InvalidIdentifier { value, .. }) if value == "Not Valid"
        ));
    }

    #[test]
    fn bad_namespace_is_rejected() {
        let driver = driver_for("[ROOT]\nnamespace = a::2b\ndata = r\n[r]\ntype = object\nmembers = a\n[a]\ntype = int\n");
        assert!(matches!(
            validate_driver(&driver),
            Err(GeneratorError::InvalidIdentifier { node, .. }) if node == "ROOT"
        ));
    }

    #[test]
    fn bad_call_back_is_rejected() {
        let driver = driver_for(&SIMPLE_SCHEMA.replace("call_back = OnCreated", "call_back = on-created"));
        assert!(matches!(
            validate_driver(&driver),
            Err(GeneratorError::InvalidIdentifier { node, .. }) if node == "vn_post"
        ));
    }

    #[test]
    fn call_back_may_not_reuse_client_member() {
        for hook in ["Create", "Validate", "get_url", "get_cud_url", "transport_", "VirtualNetworkClient"] {
            let driver = driver_for(
                &SIMPLE_SCHEMA.replace("call_back = OnCreated", &format!("call_back = {}", hook)),
            );
            match validate_driver(&driver) {
                Err(GeneratorError::InvalidAttribute { node, attribute, .. }) => {
                    assert_eq!(node, "vn_post");
                    assert_eq!(attribute, "call_back");
                }
                other => panic!("Expected InvalidAttribute for {}, got: {:?}", hook, other),
            }
        }
    }

    #[test]
    fn include_with_quote_is_rejected() {
        let driver = driver_for(&SIMPLE_SCHEMA.replace(
            "includes = base/logging.hh",
            "includes = base/logging.hh, evil\"x.hh",
        ));
        assert!(matches!(
            validate_driver(&driver),
            Err(GeneratorError::InvalidAttribute { node, attribute, .. })
                if node == "ROOT" && attribute == "includes"
        ));
    }

    // === collision checks ===

    #[test]
    fn two_nodes_with_same_struct_name_collide() {
        let driver = driver_for(
            "[ROOT]\ndata = r\n[r]\ntype = object\nmembers = x, y\n\
             [x]\ntype = struct\nstruct_name = Shared\nmembers = a\n\
             [y]\ntype = list\nstruct_name = Shared\nmembers = a\n[a]\ntype = int\n",
        );
        match validate_driver(&driver) {
            Err(GeneratorError::StructNameCollision { name, first, second }) => {
                assert_eq!(name, "Shared");
                assert_eq!(first, "x");
                assert_eq!(second, "y");
            }
            other => panic!("Expected StructNameCollision, got: {:?}", other),
        }
    }

    #[test]
    fn reused_node_does_not_collide() {
        let driver = driver_for(
            "[ROOT]\ndata = r, s\n[r]\ntype = object\nmembers = x\n[s]\ntype = object\nmembers = x\n\
             [x]\ntype = struct\nmembers = a\n[a]\ntype = int\n",
        );
        assert!(validate_driver(&driver).is_ok());
    }

    #[test]
    fn class_name_may_not_shadow_record() {
        let driver = driver_for(&SIMPLE_SCHEMA.replace(
            "struct_name = VirtualNetworkClient",
            "struct_name = VirtualNetwork",
        ));
        assert!(matches!(
            validate_driver(&driver),
            Err(GeneratorError::StructNameCollision { second, .. }) if second == "vn_client"
        ));
    }

    // === root entry checks ===

    #[test]
    fn scalar_root_data_is_rejected() {
        let driver = driver_for("[ROOT]\ndata = a\n[a]\ntype = bool\n");
        assert!(matches!(
            validate_driver(&driver),
            Err(GeneratorError::UnexpectedKind { node, found, .. }) if node == "a" && found == "bool"
        ));
    }

    #[test]
    fn class_record_must_be_declared() {
        let driver = driver_for(&SIMPLE_SCHEMA.replace(
            "includes = base/logging.hh\ndata = virtual_network",
            "includes = base/logging.hh\ndata =",
        ));
        assert!(matches!(
            validate_driver(&driver),
            Err(GeneratorError::UndeclaredRecord { class, record }) if class == "vn_codec" && record == "virtual_network"
        ));
    }
}
