//! # Built-in Schemas
//!
//! Schemas shipped with the crate. The iSCSI CHAP block is the reference
//! schema: optional, possibly empty, with mutually dependent target
//! credentials and three defaulted connection settings.

use crate::error::SchemaError;
use crate::schema::Schema;
use crate::spec::FieldSpec;

/// Initiator IQN used when the block does not name one.
pub const ISCSI_DEFAULT_INITIATOR_NAME: &str = "iqn.2019-04.me.benji-backup:benji";

/// Accepted `headerDigest` settings.
pub const ISCSI_HEADER_DIGESTS: [&str; 4] = ["NONE", "NONE_CRC32C", "CRC32C_NONE", "CRC32C"];

pub const ISCSI_DEFAULT_HEADER_DIGEST: &str = "NONE_CRC32C";

/// Connection timeout in seconds. Zero carries no special meaning here.
pub const ISCSI_DEFAULT_TIMEOUT: i64 = 0;

/// Names accepted by [`builtin`].
pub const BUILTIN_NAMES: &[&str] = &["iscsi"];

/// The iSCSI CHAP configuration block.
///
/// # Errors
///
/// Never fails in practice; the result type is kept so the schema goes
/// through the same construction checks as user-supplied ones.
pub fn iscsi_chap_schema() -> Result<Schema, SchemaError> {
    let credential = || FieldSpec::string().allow_empty(false);
    Schema::from_fields([
        ("username", credential()),
        ("password", credential().depends_on(["username"])),
        ("targetUsername", credential().depends_on(["targetPassword", "username"])),
        ("targetPassword", credential().depends_on(["targetUsername", "username"])),
        (
            "headerDigest",
            FieldSpec::string()
                .allow_empty(false)
                .allowed(ISCSI_HEADER_DIGESTS)
                .default_value(ISCSI_DEFAULT_HEADER_DIGEST),
        ),
        (
            "initiatorName",
            FieldSpec::string()
                .allow_empty(false)
                .default_value(ISCSI_DEFAULT_INITIATOR_NAME),
        ),
        (
            "timeout",
            FieldSpec::integer()
                .allow_empty(false)
                .default_value(ISCSI_DEFAULT_TIMEOUT),
        ),
    ])
}

/// Look up a built-in schema by name. `None` for unknown names.
pub fn builtin(name: &str) -> Option<Result<Schema, SchemaError>> {
    match name {
        "iscsi" => Some(iscsi_chap_schema()),
        _ => None,
    }
}
