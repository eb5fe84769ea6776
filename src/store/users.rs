use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::users::{NewUser, User, UserChange, UserPatch},
    store::Store,
};

impl Store {
    #[tracing::instrument(skip(self, new), fields(username = %new.username))]
    pub async fn create_user(&self, new: NewUser) -> AppResult<User> {
        new.validate()?;

        self.run(move |conn| {
            Box::pin(async move {
                let result = sqlx::query_as::<_, User>(
                    r#"
                        INSERT INTO
                            users (username, email, age)
                        VALUES
                            ($1, $2, $3)
                        RETURNING
                            id, username, email, age, created_at;
                    "#,
                )
                .bind(new.username.as_str())
                .bind(new.email.as_str())
                .bind(new.age)
                .fetch_one(&mut *conn)
                .await;

                match result {
                    Ok(user) => Ok(user),
                    Err(e) if is_unique_violation(&e) => Err(AppError::conflict(format!(
                        "username \"{}\" already exists",
                        new.username
                    ))),
                    Err(e) => {
                        tracing::error!(err = ?e, username = %new.username, "an error occurred when adding user");
                        Err(e.into())
                    }
                }
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.run(|conn| {
            Box::pin(async move {
                let users = sqlx::query_as::<_, User>(
                    r#"
                        SELECT
                            id, username, email, age, created_at
                        FROM users
                        ORDER BY id;
                    "#,
                )
                .fetch_all(&mut *conn)
                .await
                .inspect_err(
                    |e| tracing::error!(err = ?e, "an error occurred when fetching users from database"),
                )?;

                Ok(users)
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.run(move |conn| {
            Box::pin(async move {
                fetch_user(conn, id)
                    .await?
                    .ok_or_else(|| AppError::not_found("user not found"))
            })
        })
        .await
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> AppResult<User> {
        let changes = patch.into_changes()?;

        self.run(move |conn| {
            Box::pin(async move {
                if !user_exists(conn, id).await? {
                    return Err(AppError::not_found("user not found"));
                }

                let mut builder = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
                {
                    let mut assignments = builder.separated(", ");
                    for change in changes {
                        assignments.push(change.column());
                        assignments.push_unseparated(" = ");
                        match change {
                            UserChange::Email(email) => assignments.push_bind_unseparated(email),
                            UserChange::Age(age) => assignments.push_bind_unseparated(age),
                        };
                    }
                }
                builder.push(" WHERE id = ").push_bind(id);

                builder
                    .build()
                    .execute(&mut *conn)
                    .await
                    .inspect_err(
                        |e| tracing::error!(err = ?e, id, "an error occurred when updating user"),
                    )?;

                fetch_user(conn, id)
                    .await?
                    .ok_or_else(|| AppError::not_found("user not found"))
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.run(move |conn| {
            Box::pin(async move {
                let result = sqlx::query(
                    r#"
                        DELETE FROM users
                        WHERE id = $1;
                    "#,
                )
                .bind(id)
                .execute(&mut *conn)
                .await
                .inspect_err(
                    |e| tracing::error!(err = ?e, id, "an error occurred when deleting user"),
                )?;

                if result.rows_affected() == 0 {
                    return Err(AppError::not_found("user not found"));
                }

                Ok(())
            })
        })
        .await
    }
}

async fn fetch_user(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
            SELECT
                id, username, email, age, created_at
            FROM users
            WHERE id = $1;
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .inspect_err(|e| tracing::error!(err = ?e, id, "an error occurred when fetching user"))?;

    Ok(user)
}

async fn user_exists(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
            SELECT EXISTS (
                SELECT 1 FROM users WHERE id = $1
            );
        "#,
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await
    .inspect_err(|e| tracing::error!(err = ?e, id, "an error occurred when checking user"))?;

    Ok(exists)
}
