//! Shared test utilities for restdrv-gen tests.
//!
//! Provides a schema exercising every node tag, and helpers to derive
//! variants of it.

use restdrv_define::Schema;

/// A complete schema: one record with every field type, a codec and a CRUD
/// client using all six method kinds.
pub const SIMPLE_SCHEMA: &str = "\
[ROOT]
namespace = vnc::config
includes = base/logging.hh
data = virtual_network
methods = vn_codec, vn_client

[virtual_network]
type = object
key = virtual-network
members = uuid, display_name, vlan, enabled, ipam, prefixes

[uuid]
type = string
get_support = yes
set_support = yes

[display_name]
type = string
key = display-name
mandatory = yes

[vlan]
type = int
get_support = yes
validation = yes

[enabled]
type = bool
check_bool_set = yes
get_support = yes
set_support = yes

[ipam]
type = struct
members = ipam_name

[ipam_name]
type = string
key = ipam-name
mandatory = yes

[prefixes]
type = array
members = ip, len

[ip]
type = string
mandatory = yes

[len]
type = int

[vn_codec]
type = parse_class
data = virtual_network

[vn_client]
type = url_class
struct_name = VirtualNetworkClient
parse_class = vn_codec
interface = driver::ResourceClient
members = vn_post, vn_get, vn_put, vn_delete, vn_read, vn_validate

[vn_post]
type = POST
url = vn_cud_url
call_back = OnCreated

[vn_get]
type = GET
url = vn_item_url

[vn_put]
type = PUT
url = vn_cud_url

[vn_delete]
type = DELETE
url = vn_cud_url
call_back = OnDeleted

[vn_read]
type = READ
url = vn_item_url

[vn_validate]
type = VALIDATE

[vn_item_url]
type = url
template = value:/virtual-network/, get_abstract:uuid

[vn_cud_url]
type = url
template = value:/virtual-networks/, get_abstract:uuid, value:/vlan/, get_abstract:vlan
";

/// The two-field record of the GET scenario: `Foo{bar: string, baz: int}`.
pub const FOO_SCHEMA: &str = "\
[ROOT]
data = foo
methods = foo_codec, foo_client

[foo]
type = object
members = bar, baz

[bar]
type = string

[baz]
type = int

[foo_codec]
type = parse_class
data = foo

[foo_client]
type = url_class
parse_class = foo_codec
members = foo_get

[foo_get]
type = GET
url = foo_url

[foo_url]
type = url
template = value:/foo
";

/// Parses schema text under the source name `test_schema`.
pub fn schema_from(text: &str) -> Schema {
    Schema::parse("test_schema", text).expect("test schema parses")
}

/// Replaces the `members` line of `vn_client` in [`SIMPLE_SCHEMA`] and
/// appends extra sections.
pub fn with_class_section(members: &str, extra: &str) -> String {
    format!(
        "{}\n{}",
        SIMPLE_SCHEMA.replace(
            "members = vn_post, vn_get, vn_put, vn_delete, vn_read, vn_validate",
            members
        ),
        extra
    )
}
