//! Access-control entries on individual objects

use super::{ApiRequest, MethodInfo, Verb};
use crate::{
    builder::{Arguments, FromArguments},
    model::{Empty, ObjectAccessControl, ObjectAccessControls},
    registry::{CommandSpec, FlagSpec},
    Result,
};
use serde::Serialize;

/// Addresses a single entry on an object
#[derive(Debug, Serialize)]
pub struct Entry {
    pub bucket: String,
    pub object: String,
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
}

impl FromArguments for Entry {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, object, entity] = args.positionals()?;
        Ok(Self {
            bucket,
            object,
            entity,
            generation: args.integer("generation")?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct DeleteObjectAccessControl(pub Entry);

impl ApiRequest for DeleteObjectAccessControl {
    type Response = Empty;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Delete, "b/{bucket}/o/{object}/acl/{entity}");
}

impl FromArguments for DeleteObjectAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        Entry::from_arguments(args).map(Self)
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct GetObjectAccessControl(pub Entry);

impl ApiRequest for GetObjectAccessControl {
    type Response = ObjectAccessControl;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Get, "b/{bucket}/o/{object}/acl/{entity}");
}

impl FromArguments for GetObjectAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        Entry::from_arguments(args).map(Self)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertObjectAccessControl {
    pub bucket: String,
    pub object: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_access_control: Option<ObjectAccessControl>,
}

impl ApiRequest for InsertObjectAccessControl {
    type Response = ObjectAccessControl;
    const METHOD: MethodInfo =
        MethodInfo::new(Verb::Post, "b/{bucket}/o/{object}/acl").body("objectAccessControl");
}

impl FromArguments for InsertObjectAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, object] = args.positionals()?;
        Ok(Self {
            bucket,
            object,
            generation: args.integer("generation")?,
            object_access_control: args.json("objectAccessControl")?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ListObjectAccessControls {
    pub bucket: String,
    pub object: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
}

impl ApiRequest for ListObjectAccessControls {
    type Response = ObjectAccessControls;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Get, "b/{bucket}/o/{object}/acl");
}

impl FromArguments for ListObjectAccessControls {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, object] = args.positionals()?;
        Ok(Self {
            bucket,
            object,
            generation: args.integer("generation")?,
        })
    }
}

/// An entry on an object along with its new contents
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyEntry {
    pub bucket: String,
    pub object: String,
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_access_control: Option<ObjectAccessControl>,
}

impl FromArguments for ModifyEntry {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, object, entity] = args.positionals()?;
        Ok(Self {
            bucket,
            object,
            entity,
            generation: args.integer("generation")?,
            object_access_control: args.json("objectAccessControl")?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct PatchObjectAccessControl(pub ModifyEntry);

impl ApiRequest for PatchObjectAccessControl {
    type Response = ObjectAccessControl;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Patch, "b/{bucket}/o/{object}/acl/{entity}")
        .body("objectAccessControl");
}

impl FromArguments for PatchObjectAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        ModifyEntry::from_arguments(args).map(Self)
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct UpdateObjectAccessControl(pub ModifyEntry);

impl ApiRequest for UpdateObjectAccessControl {
    type Response = ObjectAccessControl;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Put, "b/{bucket}/o/{object}/acl/{entity}")
        .body("objectAccessControl");
}

impl FromArguments for UpdateObjectAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        ModifyEntry::from_arguments(args).map(Self)
    }
}

fn generation() -> FlagSpec {
    FlagSpec::integer(
        "generation",
        "If present, selects a specific revision of this object (as opposed to the latest version, the default).",
    )
}

fn object_access_control() -> FlagSpec {
    FlagSpec::json(
        "objectAccessControl",
        "A ObjectAccessControl resource to be passed as the request body.",
    )
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new::<DeleteObjectAccessControl>(
            "objectAccessControls_delete",
            "Permanently deletes the ACL entry for the specified entity on the specified object.",
            &["bucket", "object", "entity"],
        )
        .flags([generation()]),
        CommandSpec::new::<GetObjectAccessControl>(
            "objectAccessControls_get",
            "Returns the ACL entry for the specified entity on the specified object.",
            &["bucket", "object", "entity"],
        )
        .flags([generation()]),
        CommandSpec::new::<InsertObjectAccessControl>(
            "objectAccessControls_insert",
            "Creates a new ACL entry on the specified object.",
            &["bucket", "object"],
        )
        .flags([generation(), object_access_control()]),
        CommandSpec::new::<ListObjectAccessControls>(
            "objectAccessControls_list",
            "Retrieves ACL entries on the specified object.",
            &["bucket", "object"],
        )
        .flags([generation()]),
        CommandSpec::new::<PatchObjectAccessControl>(
            "objectAccessControls_patch",
            "Updates an ACL entry on the specified object. This method supports patch semantics.",
            &["bucket", "object", "entity"],
        )
        .flags([generation(), object_access_control()]),
        CommandSpec::new::<UpdateObjectAccessControl>(
            "objectAccessControls_update",
            "Updates an ACL entry on the specified object.",
            &["bucket", "object", "entity"],
        )
        .flags([generation(), object_access_control()]),
    ]
}
