//! SurrealDB implementation of [`GroupRepository`].
//!
//! Membership links are `member_of` edges (`user -> member_of ->
//! group`) carrying the manager flag and audit fields. A UNIQUE index
//! on `(in, out)` keeps at most one edge per pair.

use agora_core::error::AgoraResult;
use agora_core::models::group::{CreateGroup, Group, UpdateGroup, effective_sort_order};
use agora_core::models::group_membership::{CreateGroupMembership, GroupMembership};
use agora_core::models::user::User;
use agora_core::repository::{GroupRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::user::UserRowWithId;
use super::{CountRow, first_count, parse_optional_uuid, parse_uuid};
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct GroupRow {
    space_id: Option<String>,
    name: String,
    description: String,
    sort_order: i32,
    show_at_directory: bool,
    show_at_registration: bool,
    is_admin_group: bool,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: DateTime<Utc>,
    updated_by: Option<String>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct GroupRowWithId {
    record_id: String,
    space_id: Option<String>,
    name: String,
    description: String,
    sort_order: i32,
    show_at_directory: bool,
    show_at_registration: bool,
    is_admin_group: bool,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: DateTime<Utc>,
    updated_by: Option<String>,
}

impl GroupRow {
    fn into_group(self, id: Uuid) -> Result<Group, DbError> {
        Ok(Group {
            id,
            space_id: parse_optional_uuid("space", self.space_id.as_deref())?,
            name: self.name,
            description: self.description,
            sort_order: self.sort_order,
            show_at_directory: self.show_at_directory,
            show_at_registration: self.show_at_registration,
            is_admin_group: self.is_admin_group,
            created_at: self.created_at,
            created_by: parse_optional_uuid("creator", self.created_by.as_deref())?,
            updated_at: self.updated_at,
            updated_by: parse_optional_uuid("updater", self.updated_by.as_deref())?,
        })
    }
}

impl GroupRowWithId {
    fn try_into_group(self) -> Result<Group, DbError> {
        let id = parse_uuid("group", &self.record_id)?;
        GroupRow {
            space_id: self.space_id,
            name: self.name,
            description: self.description,
            sort_order: self.sort_order,
            show_at_directory: self.show_at_directory,
            show_at_registration: self.show_at_registration,
            is_admin_group: self.is_admin_group,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
        .into_group(id)
    }
}

/// DB-side row struct for `member_of` edges.
#[derive(Debug, SurrealValue)]
struct MembershipRow {
    user_id: String,
    group_id: String,
    is_group_manager: bool,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
}

impl MembershipRow {
    fn try_into_membership(self) -> Result<GroupMembership, DbError> {
        Ok(GroupMembership {
            group_id: parse_uuid("group", &self.group_id)?,
            user_id: parse_uuid("user", &self.user_id)?,
            is_group_manager: self.is_group_manager,
            created_at: self.created_at,
            created_by: parse_optional_uuid("creator", self.created_by.as_deref())?,
        })
    }
}

const SELECT_MEMBERSHIP: &str = "\
SELECT meta::id(in) AS user_id, meta::id(out) AS group_id, \
is_group_manager, created_at, created_by FROM member_of \
WHERE in = type::record('user', $user_id) \
AND out = type::record('group', $group_id)";

fn collect_groups(rows: Vec<GroupRowWithId>) -> Result<Vec<Group>, DbError> {
    rows.into_iter().map(|row| row.try_into_group()).collect()
}

fn collect_users(rows: Vec<UserRowWithId>) -> Result<Vec<User>, DbError> {
    rows.into_iter().map(|row| row.try_into_user()).collect()
}

/// SurrealDB implementation of the Group repository.
#[derive(Clone)]
pub struct SurrealGroupRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGroupRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn select_groups(&self, query: &str) -> Result<Vec<Group>, DbError> {
        let mut result = self.db.query(query).await?;
        let rows: Vec<GroupRowWithId> = result.take(0)?;
        collect_groups(rows)
    }

    async fn record_exists(&self, table: &str, id: Uuid) -> Result<bool, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM type::table($table) \
                 WHERE id = type::record($table, $id) GROUP ALL",
            )
            .bind(("table", table.to_string()))
            .bind(("id", id.to_string()))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(first_count(&rows) > 0)
    }
}

impl<C: Connection> GroupRepository for SurrealGroupRepository<C> {
    async fn create(&self, input: CreateGroup) -> AgoraResult<Group> {
        input.validate()?;
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('group', $id) SET \
                 space_id = $space_id, name = $name, \
                 description = $description, sort_order = $sort_order, \
                 show_at_directory = $show_at_directory, \
                 show_at_registration = $show_at_registration, \
                 is_admin_group = $is_admin_group, \
                 created_by = $created_by, updated_by = $created_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("space_id", input.space_id.map(|s| s.to_string())))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("sort_order", effective_sort_order(input.sort_order)))
            .bind(("show_at_directory", input.show_at_directory))
            .bind(("show_at_registration", input.show_at_registration))
            .bind(("is_admin_group", input.is_admin_group))
            .bind(("created_by", input.created_by.map(|u| u.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("group", e))?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "group".into(),
            id: id_str,
        })?;

        Ok(row.into_group(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AgoraResult<Group> {
        self.find_by_id(id).await?.ok_or_else(|| {
            DbError::NotFound {
                entity: "group".into(),
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AgoraResult<Option<Group>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('group', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_group(id)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: Uuid, input: UpdateGroup) -> AgoraResult<Group> {
        let current = self.get_by_id(id).await?;
        input.validate_against(&current)?;
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.space_id.is_some() {
            sets.push("space_id = $space_id");
        }
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.sort_order.is_some() {
            sets.push("sort_order = $sort_order");
        }
        if input.show_at_directory.is_some() {
            sets.push("show_at_directory = $show_at_directory");
        }
        if input.show_at_registration.is_some() {
            sets.push("show_at_registration = $show_at_registration");
        }
        if input.is_admin_group.is_some() {
            sets.push("is_admin_group = $is_admin_group");
        }
        sets.push("updated_by = $updated_by");
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('group', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("updated_by", input.updated_by.map(|u| u.to_string())));

        if let Some(space_id) = input.space_id {
            builder = builder.bind(("space_id", space_id.map(|s| s.to_string())));
        }
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(sort_order) = input.sort_order {
            builder = builder.bind(("sort_order", effective_sort_order(Some(sort_order))));
        }
        if let Some(show) = input.show_at_directory {
            builder = builder.bind(("show_at_directory", show));
        }
        if let Some(show) = input.show_at_registration {
            builder = builder.bind(("show_at_registration", show));
        }
        if let Some(is_admin) = input.is_admin_group {
            builder = builder.bind(("is_admin_group", is_admin));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("group", e))?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "group".into(),
            id: id_str,
        })?;

        Ok(row.into_group(id)?)
    }

    async fn delete(&self, id: Uuid) -> AgoraResult<()> {
        self.db
            .query(
                "DELETE member_of WHERE out = type::record('group', $id); \
                 DELETE type::record('group', $id);",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement("group", e))?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> AgoraResult<PaginatedResult<Group>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM group GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = first_count(&count_rows);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 ORDER BY sort_order ASC, name ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(PaginatedResult {
            items: collect_groups(rows)?,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn find_admin_group(&self) -> AgoraResult<Option<Group>> {
        let groups = self
            .select_groups(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE is_admin_group = true \
                 ORDER BY created_at ASC LIMIT 1",
            )
            .await?;
        Ok(groups.into_iter().next())
    }

    async fn list_directory_groups(&self) -> AgoraResult<Vec<Group>> {
        Ok(self
            .select_groups(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE show_at_directory = true \
                 ORDER BY sort_order ASC, name ASC",
            )
            .await?)
    }

    async fn list_registration_groups(&self) -> AgoraResult<Vec<Group>> {
        Ok(self
            .select_groups(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE show_at_registration = true \
                 AND is_admin_group = false \
                 ORDER BY name ASC",
            )
            .await?)
    }

    async fn add_member(&self, input: CreateGroupMembership) -> AgoraResult<GroupMembership> {
        let user_id_str = input.user_id.to_string();
        let group_id_str = input.group_id.to_string();

        if !self.record_exists("user", input.user_id).await? {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: user_id_str,
            }
            .into());
        }
        if !self.record_exists("group", input.group_id).await? {
            return Err(DbError::NotFound {
                entity: "group".into(),
                id: group_id_str,
            }
            .into());
        }

        let query = format!(
            "RELATE user:`{user_id_str}` -> member_of -> group:`{group_id_str}` \
             SET is_group_manager = $is_group_manager, \
             created_by = $created_by; \
             {select};",
            select = SELECT_MEMBERSHIP
        );

        let result = self
            .db
            .query(query)
            .bind(("is_group_manager", input.is_group_manager))
            .bind(("created_by", input.created_by.map(|u| u.to_string())))
            .bind(("user_id", user_id_str.clone()))
            .bind(("group_id", group_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("group membership", e))?;

        let rows: Vec<MembershipRow> = result.take(1).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "group membership".into(),
            id: format!("{group_id_str}/{user_id_str}"),
        })?;

        debug!(
            group_id = %input.group_id,
            user_id = %input.user_id,
            is_group_manager = input.is_group_manager,
            "Membership edge created"
        );

        Ok(row.try_into_membership()?)
    }

    async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> AgoraResult<bool> {
        if self.get_membership(group_id, user_id).await?.is_none() {
            return Ok(false);
        }

        self.db
            .query(
                "DELETE member_of WHERE \
                 in = type::record('user', $user_id) AND \
                 out = type::record('group', $group_id)",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement("group membership", e))?;

        debug!(group_id = %group_id, user_id = %user_id, "Membership edge deleted");

        Ok(true)
    }

    async fn get_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> AgoraResult<Option<GroupMembership>> {
        let mut result = self
            .db
            .query(SELECT_MEMBERSHIP)
            .bind(("user_id", user_id.to_string()))
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_membership()?)),
            None => Ok(None),
        }
    }

    async fn count_members(&self, group_id: Uuid) -> AgoraResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM member_of \
                 WHERE out = type::record('group', $group_id) GROUP ALL",
            )
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_count(&rows))
    }

    async fn count_managers(&self, group_id: Uuid, user_id: Option<Uuid>) -> AgoraResult<u64> {
        let user_filter = if user_id.is_some() {
            "AND in = type::record('user', $user_id) "
        } else {
            ""
        };
        let query = format!(
            "SELECT count() AS total FROM member_of \
             WHERE out = type::record('group', $group_id) \
             AND is_group_manager = true {user_filter}GROUP ALL"
        );

        let mut builder = self
            .db
            .query(query)
            .bind(("group_id", group_id.to_string()));
        if let Some(user_id) = user_id {
            builder = builder.bind(("user_id", user_id.to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_count(&rows))
    }

    async fn get_members(
        &self,
        group_id: Uuid,
        pagination: Pagination,
    ) -> AgoraResult<PaginatedResult<User>> {
        let total = self.count_members(group_id).await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE id IN (\
                     SELECT VALUE in FROM member_of \
                     WHERE out = type::record('group', $group_id)\
                 ) \
                 ORDER BY username ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("group_id", group_id.to_string()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(PaginatedResult {
            items: collect_users(rows)?,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn get_managers(&self, group_id: Uuid) -> AgoraResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE id IN (\
                     SELECT VALUE in FROM member_of \
                     WHERE out = type::record('group', $group_id) \
                     AND is_group_manager = true\
                 ) \
                 ORDER BY username ASC",
            )
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(collect_users(rows)?)
    }

    async fn get_user_groups(&self, user_id: Uuid) -> AgoraResult<Vec<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE id IN (\
                     SELECT VALUE out FROM member_of \
                     WHERE in = type::record('user', $user_id)\
                 ) \
                 ORDER BY sort_order ASC, name ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(collect_groups(rows)?)
    }
}
