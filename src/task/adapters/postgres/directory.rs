//! `PostgreSQL` member directory implementation.

use super::{
    models::{MemberRow, NewMemberRow},
    schema::members,
    store::TaskPgPool,
};
use crate::task::{
    domain::{GroupId, Member, MemberId, MemberName},
    ports::{MemberDirectory, MemberDirectoryError, MemberDirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mockable::{Clock, DefaultClock};

/// `PostgreSQL`-backed member directory.
#[derive(Debug, Clone)]
pub struct PostgresMemberDirectory {
    pool: TaskPgPool,
}

impl PostgresMemberDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> MemberDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> MemberDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(MemberDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(MemberDirectoryError::persistence)?
    }
}

#[async_trait]
impl MemberDirectory for PostgresMemberDirectory {
    async fn find_by_name(
        &self,
        group: &GroupId,
        name: &MemberName,
    ) -> MemberDirectoryResult<Option<Member>> {
        let group_key = group.as_str().to_owned();
        let name_key = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = members::table
                .filter(members::name.eq(name_key))
                .filter(members::group_id.eq(group_key))
                .select(MemberRow::as_select())
                .first::<MemberRow>(connection)
                .optional()
                .map_err(MemberDirectoryError::persistence)?;
            row.map(row_to_member).transpose()
        })
        .await
    }

    async fn register(
        &self,
        group: &GroupId,
        name: &MemberName,
    ) -> MemberDirectoryResult<Member> {
        let group_key = group.as_str().to_owned();
        let name_key = name.as_str().to_owned();
        let new_row = NewMemberRow {
            id: MemberId::new().into_inner(),
            name: name_key.clone(),
            group_id: group_key.clone(),
            created_at: DefaultClock.utc(),
        };
        self.run_blocking(move |connection| {
            // Losing the conflict race is fine: the follow-up select
            // returns whichever row won the (name, group) uniqueness.
            diesel::insert_into(members::table)
                .values(&new_row)
                .on_conflict((members::name, members::group_id))
                .do_nothing()
                .execute(connection)
                .map_err(MemberDirectoryError::persistence)?;
            let row = members::table
                .filter(members::name.eq(name_key))
                .filter(members::group_id.eq(group_key))
                .select(MemberRow::as_select())
                .first::<MemberRow>(connection)
                .map_err(MemberDirectoryError::persistence)?;
            row_to_member(row)
        })
        .await
    }
}

fn row_to_member(row: MemberRow) -> MemberDirectoryResult<Member> {
    let MemberRow {
        id,
        name,
        group_id,
        created_at,
    } = row;
    let member_name = MemberName::new(name).map_err(MemberDirectoryError::persistence)?;
    Ok(Member::new(
        MemberId::from_uuid(id),
        member_name,
        GroupId::new(group_id),
        created_at,
    ))
}
