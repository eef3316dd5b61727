//! Default access-control entries applied to new objects in a bucket

use super::{flags, ApiRequest, MetagenerationMatch, MethodInfo, Verb};
use crate::{
    builder::{Arguments, FromArguments},
    model::{Empty, ObjectAccessControl, ObjectAccessControls},
    registry::{CommandSpec, FlagSpec},
    Result,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DeleteDefaultObjectAccessControl {
    pub bucket: String,
    pub entity: String,
}

impl ApiRequest for DeleteDefaultObjectAccessControl {
    type Response = Empty;
    const METHOD: MethodInfo =
        MethodInfo::new(Verb::Delete, "b/{bucket}/defaultObjectAcl/{entity}");
}

impl FromArguments for DeleteDefaultObjectAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, entity] = args.positionals()?;
        Ok(Self { bucket, entity })
    }
}

#[derive(Debug, Serialize)]
pub struct GetDefaultObjectAccessControl {
    pub bucket: String,
    pub entity: String,
}

impl ApiRequest for GetDefaultObjectAccessControl {
    type Response = ObjectAccessControl;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Get, "b/{bucket}/defaultObjectAcl/{entity}");
}

impl FromArguments for GetDefaultObjectAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, entity] = args.positionals()?;
        Ok(Self { bucket, entity })
    }
}

#[derive(Debug, Serialize)]
pub struct InsertDefaultObjectAccessControl {
    pub bucket: String,
    #[serde(flatten)]
    pub acl: ObjectAccessControl,
}

impl ApiRequest for InsertDefaultObjectAccessControl {
    type Response = ObjectAccessControl;
    const METHOD: MethodInfo =
        MethodInfo::new(Verb::Post, "b/{bucket}/defaultObjectAcl").whole_body();
}

impl FromArguments for InsertDefaultObjectAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket] = args.positionals()?;
        Ok(Self {
            bucket,
            acl: acl_from_arguments(args)?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDefaultObjectAccessControls {
    pub bucket: String,
    #[serde(flatten)]
    pub preconditions: MetagenerationMatch,
}

impl ApiRequest for ListDefaultObjectAccessControls {
    type Response = ObjectAccessControls;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Get, "b/{bucket}/defaultObjectAcl");
}

impl FromArguments for ListDefaultObjectAccessControls {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket] = args.positionals()?;
        Ok(Self {
            bucket,
            preconditions: MetagenerationMatch::from_arguments(args)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PatchDefaultObjectAccessControl {
    pub bucket: String,
    pub entity: String,
    #[serde(flatten)]
    pub acl: ObjectAccessControl,
}

impl ApiRequest for PatchDefaultObjectAccessControl {
    type Response = ObjectAccessControl;
    const METHOD: MethodInfo =
        MethodInfo::new(Verb::Patch, "b/{bucket}/defaultObjectAcl/{entity}").whole_body();
}

impl FromArguments for PatchDefaultObjectAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, entity] = args.positionals()?;
        Ok(Self {
            bucket,
            entity,
            acl: acl_from_arguments(args)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateDefaultObjectAccessControl {
    pub bucket: String,
    pub entity: String,
    #[serde(flatten)]
    pub acl: ObjectAccessControl,
}

impl ApiRequest for UpdateDefaultObjectAccessControl {
    type Response = ObjectAccessControl;
    const METHOD: MethodInfo =
        MethodInfo::new(Verb::Put, "b/{bucket}/defaultObjectAcl/{entity}").whole_body();
}

impl FromArguments for UpdateDefaultObjectAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, entity] = args.positionals()?;
        Ok(Self {
            bucket,
            entity,
            acl: acl_from_arguments(args)?,
        })
    }
}

fn acl_from_arguments(args: &Arguments<'_>) -> Result<ObjectAccessControl> {
    Ok(ObjectAccessControl {
        bucket: None,
        domain: args.text("domain"),
        email: args.text("email"),
        entity: args.text("entity"),
        entity_id: args.text("entityId"),
        etag: args.text("etag"),
        generation: args.integer("generation")?,
        id: args.text("id"),
        kind: args.text("kind"),
        object: args.text("object"),
        project_team: args.json("projectTeam")?,
        role: args.text("role"),
        self_link: args.text("selfLink"),
    })
}

fn acl_flags(with_entity: bool) -> Vec<FlagSpec> {
    let mut flags = vec![
        FlagSpec::string("domain", "The domain associated with the entity, if any."),
        FlagSpec::string("email", "The email address associated with the entity, if any."),
    ];

    if with_entity {
        flags.push(FlagSpec::string(
            "entity",
            "The entity holding the permission, in one of the following forms: user-userId, user-email, group-groupId, group-email, domain-domain, project-team-projectId, allUsers, allAuthenticatedUsers.",
        ));
    }

    flags.extend([
        FlagSpec::string("entityId", "The ID for the entity, if any."),
        FlagSpec::string("etag", "HTTP 1.1 Entity tag for the access-control entry."),
        FlagSpec::integer("generation", "The content generation of the object."),
        FlagSpec::string("id", "The ID of the access-control entry."),
        FlagSpec::string(
            "kind",
            "The kind of item this is. For object access control entries, this is always storage#objectAccessControl.",
        )
        .default_value("storage#objectAccessControl"),
        FlagSpec::string("object", "The name of the object."),
        FlagSpec::json("projectTeam", "The project team associated with the entity, if any."),
        FlagSpec::string(
            "role",
            "The access permission for the entity. Can be READER or OWNER.",
        ),
        FlagSpec::string("selfLink", "The link to this access-control entry."),
    ]);

    flags
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new::<DeleteDefaultObjectAccessControl>(
            "defaultObjectAccessControls_delete",
            "Permanently deletes the default object ACL entry for the specified entity on the specified bucket.",
            &["bucket", "entity"],
        ),
        CommandSpec::new::<GetDefaultObjectAccessControl>(
            "defaultObjectAccessControls_get",
            "Returns the default object ACL entry for the specified entity on the specified bucket.",
            &["bucket", "entity"],
        ),
        CommandSpec::new::<InsertDefaultObjectAccessControl>(
            "defaultObjectAccessControls_insert",
            "Creates a new default object ACL entry on the specified bucket.",
            &["bucket"],
        )
        .flags(acl_flags(true)),
        CommandSpec::new::<ListDefaultObjectAccessControls>(
            "defaultObjectAccessControls_list",
            "Retrieves default object ACL entries on the specified bucket.",
            &["bucket"],
        )
        .flags(flags::if_metageneration_match(flags::Subject::Bucket)),
        CommandSpec::new::<PatchDefaultObjectAccessControl>(
            "defaultObjectAccessControls_patch",
            "Updates a default object ACL entry on the specified bucket. This method supports patch semantics.",
            &["bucket", "entity"],
        )
        .flags(acl_flags(false)),
        CommandSpec::new::<UpdateDefaultObjectAccessControl>(
            "defaultObjectAccessControls_update",
            "Updates a default object ACL entry on the specified bucket.",
            &["bucket", "entity"],
        )
        .flags(acl_flags(false)),
    ]
}
