//! Access-control entries on buckets

use super::{ApiRequest, MethodInfo, Verb};
use crate::{
    builder::{Arguments, FromArguments},
    model::{BucketAccessControl, BucketAccessControls, Empty},
    registry::{CommandSpec, FlagSpec},
    Result,
};
use serde::Serialize;

/// Permanently deletes the ACL entry for the specified entity on the specified bucket
#[derive(Debug, Serialize)]
pub struct DeleteBucketAccessControl {
    pub bucket: String,
    pub entity: String,
}

impl ApiRequest for DeleteBucketAccessControl {
    type Response = Empty;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Delete, "b/{bucket}/acl/{entity}");
}

impl FromArguments for DeleteBucketAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, entity] = args.positionals()?;
        Ok(Self { bucket, entity })
    }
}

/// Returns the ACL entry for the specified entity on the specified bucket
#[derive(Debug, Serialize)]
pub struct GetBucketAccessControl {
    pub bucket: String,
    pub entity: String,
}

impl ApiRequest for GetBucketAccessControl {
    type Response = BucketAccessControl;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Get, "b/{bucket}/acl/{entity}");
}

impl FromArguments for GetBucketAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, entity] = args.positionals()?;
        Ok(Self { bucket, entity })
    }
}

/// Creates a new ACL entry on the specified bucket, the request is the entry itself
#[derive(Debug, Serialize)]
pub struct InsertBucketAccessControl {
    pub bucket: String,
    #[serde(flatten)]
    pub acl: BucketAccessControl,
}

impl ApiRequest for InsertBucketAccessControl {
    type Response = BucketAccessControl;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Post, "b/{bucket}/acl").whole_body();
}

impl FromArguments for InsertBucketAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket] = args.positionals()?;
        Ok(Self {
            bucket,
            acl: acl_from_arguments(args)?,
        })
    }
}

/// Retrieves ACL entries on the specified bucket
#[derive(Debug, Serialize)]
pub struct ListBucketAccessControls {
    pub bucket: String,
}

impl ApiRequest for ListBucketAccessControls {
    type Response = BucketAccessControls;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Get, "b/{bucket}/acl");
}

impl FromArguments for ListBucketAccessControls {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket] = args.positionals()?;
        Ok(Self { bucket })
    }
}

/// Updates an ACL entry on the specified bucket, only the supplied fields
/// are changed
#[derive(Debug, Serialize)]
pub struct PatchBucketAccessControl {
    pub bucket: String,
    pub entity: String,
    #[serde(flatten)]
    pub acl: BucketAccessControl,
}

impl ApiRequest for PatchBucketAccessControl {
    type Response = BucketAccessControl;
    const METHOD: MethodInfo =
        MethodInfo::new(Verb::Patch, "b/{bucket}/acl/{entity}").whole_body();
}

impl FromArguments for PatchBucketAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, entity] = args.positionals()?;
        Ok(Self {
            bucket,
            entity,
            acl: acl_from_arguments(args)?,
        })
    }
}

/// Replaces an ACL entry on the specified bucket
#[derive(Debug, Serialize)]
pub struct UpdateBucketAccessControl {
    pub bucket: String,
    pub entity: String,
    #[serde(flatten)]
    pub acl: BucketAccessControl,
}

impl ApiRequest for UpdateBucketAccessControl {
    type Response = BucketAccessControl;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Put, "b/{bucket}/acl/{entity}").whole_body();
}

impl FromArguments for UpdateBucketAccessControl {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, entity] = args.positionals()?;
        Ok(Self {
            bucket,
            entity,
            acl: acl_from_arguments(args)?,
        })
    }
}

/// Fills out the fields of an entry from flags, the path parameters are
/// kept in the request itself
fn acl_from_arguments(args: &Arguments<'_>) -> Result<BucketAccessControl> {
    Ok(BucketAccessControl {
        bucket: None,
        domain: args.text("domain"),
        email: args.text("email"),
        entity: args.text("entity"),
        entity_id: args.text("entityId"),
        etag: args.text("etag"),
        id: args.text("id"),
        kind: args.text("kind"),
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
        FlagSpec::string("id", "The ID of the access-control entry."),
        FlagSpec::string(
            "kind",
            "The kind of item this is. For bucket access control entries, this is always storage#bucketAccessControl.",
        )
        .default_value("storage#bucketAccessControl"),
        FlagSpec::json("projectTeam", "The project team associated with the entity, if any."),
        FlagSpec::string(
            "role",
            "The access permission for the entity. Can be READER, WRITER, or OWNER.",
        ),
        FlagSpec::string("selfLink", "The link to this access-control entry."),
    ]);

    flags
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new::<DeleteBucketAccessControl>(
            "bucketAccessControls_delete",
            "Permanently deletes the ACL entry for the specified entity on the specified bucket.",
            &["bucket", "entity"],
        ),
        CommandSpec::new::<GetBucketAccessControl>(
            "bucketAccessControls_get",
            "Returns the ACL entry for the specified entity on the specified bucket.",
            &["bucket", "entity"],
        ),
        CommandSpec::new::<InsertBucketAccessControl>(
            "bucketAccessControls_insert",
            "Creates a new ACL entry on the specified bucket.",
            &["bucket"],
        )
        .flags(acl_flags(true)),
        CommandSpec::new::<ListBucketAccessControls>(
            "bucketAccessControls_list",
            "Retrieves ACL entries on the specified bucket.",
            &["bucket"],
        ),
        CommandSpec::new::<PatchBucketAccessControl>(
            "bucketAccessControls_patch",
            "Updates an ACL entry on the specified bucket. This method supports patch semantics.",
            &["bucket", "entity"],
        )
        .flags(acl_flags(false)),
        CommandSpec::new::<UpdateBucketAccessControl>(
            "bucketAccessControls_update",
            "Updates an ACL entry on the specified bucket.",
            &["bucket", "entity"],
        )
        .flags(acl_flags(false)),
    ]
}
