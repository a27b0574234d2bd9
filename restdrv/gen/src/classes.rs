//! Resolution of `ROOT.methods` into codec and CRUD classes.
//!
//! A `parse_class` names the record it marshals through `data`. A
//! `url_class` names a codec through `parse_class` and lists its method
//! descriptors in `members`; each descriptor names a `url` node whose
//! template is parsed here, so the emitters only see checked values.
//!
//! Classes are resolved in `ROOT.methods` order and may only refer to codecs
//! listed before them, because the header declares them in that order.

use std::collections::HashMap;

use restdrv_define::{ClassKind, MethodKind, NodeKind, Schema, SchemaNode, UrlCategory};
use tracing::debug;

use crate::errors::GeneratorError;
use crate::model::{
    Class, Driver, FieldKind, Method, ParseClass, Record, UrlClass, UrlPart, UrlTemplate,
    url_function,
};
use crate::parser::{UrlToken, parse_url_template};
use crate::walker::{resolve, struct_name_of};

/// Resolves every `ROOT.data` record and `ROOT.methods` class.
///
/// Record tags of `ROOT.data` entries are checked later by
/// [`crate::validation::validate_driver`].
///
/// ## Errors
///
/// Returns the first resolution error, see [`resolve`] and [`resolve_class`].
pub fn resolve_driver(schema: &Schema) -> Result<Driver, GeneratorError> {
    let records = schema
        .data()
        .into_iter()
        .map(|name| resolve(schema, name))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Resolved {} records", records.len());

    let mut classes = Vec::new();
    for name in schema.methods() {
        let class = resolve_class(schema, name, &classes)?;
        debug!("Resolved class '{}' as {}", name, class.class_name());
        classes.push(class);
    }

    Ok(Driver {
        source_name: schema.source_name().to_string(),
        namespace: schema.namespace().to_string(),
        includes: schema.includes().into_iter().map(str::to_string).collect(),
        records,
        classes,
    })
}

/// Resolves one entry of `ROOT.methods`.
///
/// `earlier` holds the classes already resolved; codecs referenced by a
/// `url_class` must be among them.
///
/// ## Errors
///
/// - `GeneratorError::UnexpectedKind` if the node is not a class, or refers
///   to a node of the wrong kind;
/// - `GeneratorError::InvalidAttribute` if a referenced codec is not listed
///   earlier in `ROOT.methods`, or a method carries an attribute it cannot use;
/// - `GeneratorError::DuplicateMethod`, `GeneratorError::UrlConflict`,
///   `GeneratorError::CodecCapability` and `GeneratorError::RecordMismatch`
///   for inconsistent methods;
/// - URL template errors from [`parse_url_template`] and
///   `GeneratorError::UnknownAccessor`.
pub fn resolve_class(
    schema: &Schema,
    name: &str,
    earlier: &[Class],
) -> Result<Class, GeneratorError> {
    let node = schema.node(name)?;
    match node.kind()? {
        NodeKind::Class(ClassKind::ParseClass) => parse_class(schema, node).map(Class::Parse),
        NodeKind::Class(ClassKind::UrlClass) => url_class(schema, node, earlier).map(Class::Url),
        other => Err(unexpected(name, "a parse_class or url_class", other)),
    }
}

fn unexpected(node: &str, expected: &str, found: NodeKind) -> GeneratorError {
    GeneratorError::UnexpectedKind {
        node: node.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

fn parse_class(schema: &Schema, node: &SchemaNode) -> Result<ParseClass, GeneratorError> {
    let data = node.require("data")?;
    let field = resolve(schema, data).map_err(|e| e.in_member(node.name(), data))?;
    let FieldKind::Record(record) = field.kind else {
        let found = schema.node(data)?.kind()?;
        return Err(unexpected(data, "an object or struct", found).in_member(node.name(), data));
    };

    Ok(ParseClass {
        node: node.name().to_string(),
        class_name: struct_name_of(node, ""),
        data: field.name,
        key: field.key,
        record,
        parse: node.flag("parse_support", true)?,
        build: node.flag("build_support", true)?,
    })
}

/// Finds a codec listed before the class that refers to it.
fn earlier_codec<'c>(
    schema: &Schema,
    class: &str,
    attribute: &str,
    codec: &str,
    earlier: &'c [Class],
) -> Result<&'c ParseClass, GeneratorError> {
    for entry in earlier {
        if let Class::Parse(parse) = entry
            && parse.node == codec
        {
            return Ok(parse);
        }
    }

    match schema.node(codec)?.kind()? {
        NodeKind::Class(ClassKind::ParseClass) => Err(GeneratorError::InvalidAttribute {
            node: class.to_string(),
            attribute: attribute.to_string(),
            reason: format!("'{}' must be listed in ROOT.methods before '{}'", codec, class),
        }),
        other => Err(unexpected(codec, "a parse_class", other)),
    }
}

fn url_class(
    schema: &Schema,
    node: &SchemaNode,
    earlier: &[Class],
) -> Result<UrlClass, GeneratorError> {
    let class = node.name();
    let codec_name = node.require("parse_class")?;
    let codec = earlier_codec(schema, class, "parse_class", codec_name, earlier)?;

    let members = node.list("members");
    if members.is_empty() {
        return Err(GeneratorError::EmptyMembers {
            node: class.to_string(),
        });
    }

    let mut methods: Vec<Method> = Vec::with_capacity(members.len());
    let mut urls: HashMap<UrlCategory, &str> = HashMap::new();
    for member in members {
        let (method, url) = method(schema, member, &codec.record, earlier)
            .map_err(|e| e.in_member(class, member))?;

        if methods.iter().any(|seen| seen.kind == method.kind) {
            return Err(GeneratorError::DuplicateMethod {
                class: class.to_string(),
                method: method.kind.to_string(),
            });
        }
        check_capability(class, codec, &method)?;

        if let (Some(category), Some(url)) = (method.kind.url_category(), url) {
            match urls.get(&category) {
                Some(first) if *first != url => {
                    return Err(GeneratorError::UrlConflict {
                        class: class.to_string(),
                        function: url_function(category).to_string(),
                        first: first.to_string(),
                        second: url.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    urls.insert(category, url);
                }
            }
        }
        methods.push(method);
    }

    let template_for = |category: UrlCategory| -> Result<Option<UrlTemplate>, GeneratorError> {
        urls.get(&category)
            .map(|url| url_template(schema, url, &codec.record))
            .transpose()
    };

    Ok(UrlClass {
        node: class.to_string(),
        class_name: struct_name_of(node, ""),
        interface: node
            .attr("interface")
            .filter(|base| !base.is_empty())
            .map(str::to_string),
        codec: codec.class_name.clone(),
        data: codec.data.clone(),
        record: codec.record.clone(),
        read_url: template_for(UrlCategory::Read)?,
        cud_url: template_for(UrlCategory::Cud)?,
        methods,
    })
}

/// Resolves a method descriptor, returning it with its `url` node name.
fn method<'s>(
    schema: &'s Schema,
    name: &str,
    record: &Record,
    earlier: &[Class],
) -> Result<(Method, Option<&'s str>), GeneratorError> {
    let node = schema.node(name)?;
    let kind = match node.kind()? {
        NodeKind::Method(kind) => kind,
        other => return Err(unexpected(name, "a method descriptor", other)),
    };

    let url = if kind == MethodKind::Validate {
        if node.attr("url").is_some_and(|url| !url.is_empty()) {
            return Err(GeneratorError::InvalidAttribute {
                node: name.to_string(),
                attribute: "url".to_string(),
                reason: "VALIDATE runs locally and has no URL".to_string(),
            });
        }
        None
    } else {
        Some(node.require("url")?)
    };

    let request_codec = match node.attr("request_members").filter(|rm| !rm.is_empty()) {
        None => None,
        Some(_) if !kind.carries_payload() => {
            return Err(GeneratorError::InvalidAttribute {
                node: name.to_string(),
                attribute: "request_members".to_string(),
                reason: format!("{} sends no payload", kind),
            });
        }
        Some(codec_name) => {
            let codec = earlier_codec(schema, name, "request_members", codec_name, earlier)?;
            if codec.record.struct_name != record.struct_name {
                return Err(GeneratorError::RecordMismatch {
                    class: name.to_string(),
                    codec: codec_name.to_string(),
                    expected: record.struct_name.clone(),
                    found: codec.record.struct_name.clone(),
                });
            }
            if !codec.build {
                return Err(GeneratorError::CodecCapability {
                    class: name.to_string(),
                    codec: codec_name.to_string(),
                    capability: "build".to_string(),
                });
            }
            Some(codec.class_name.clone())
        }
    };

    let call_back = node
        .attr("call_back")
        .filter(|hook| !hook.is_empty())
        .map(str::to_string);

    Ok((
        Method {
            node: name.to_string(),
            kind,
            request_codec,
            call_back,
        },
        url,
    ))
}

/// Checks that the class codec can serve a method.
fn check_capability(
    class: &str,
    codec: &ParseClass,
    method: &Method,
) -> Result<(), GeneratorError> {
    let missing = match method.kind {
        MethodKind::Get if !codec.parse => Some("parse"),
        MethodKind::Post | MethodKind::Put if method.request_codec.is_none() && !codec.build => {
            Some("build")
        }
        _ => None,
    };
    match missing {
        Some(capability) => Err(GeneratorError::CodecCapability {
            class: class.to_string(),
            codec: codec.node.clone(),
            capability: capability.to_string(),
        }),
        None => Ok(()),
    }
}

/// Parses a `url` node against the record whose accessors it may call.
fn url_template(
    schema: &Schema,
    name: &str,
    record: &Record,
) -> Result<UrlTemplate, GeneratorError> {
    let node = schema.node(name)?;
    match node.kind()? {
        NodeKind::Url => {}
        other => return Err(unexpected(name, "a url node", other)),
    }

    let parts = parse_url_template(name, node.require("template")?)?
        .into_iter()
        .map(|token| match token {
            UrlToken::Literal(text) => Ok(UrlPart::Literal(text)),
            UrlToken::Accessor(member) => accessor(name, record, member),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(UrlTemplate {
        node: name.to_string(),
        parts,
    })
}

fn accessor(url: &str, record: &Record, member: String) -> Result<UrlPart, GeneratorError> {
    let fail = |reason: String| GeneratorError::UnknownAccessor {
        node: url.to_string(),
        member: member.clone(),
        reason,
    };

    let Some(field) = record.member(&member) else {
        return Err(fail(format!("'{}' has no such member", record.struct_name)));
    };
    let Some(scalar) = field.as_scalar() else {
        return Err(fail("only string, int and bool members can appear in a URL".to_string()));
    };
    if !field.flags.get {
        return Err(fail("the member needs get_support = yes".to_string()));
    }

    Ok(UrlPart::Accessor { member, scalar })
}
