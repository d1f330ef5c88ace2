//! Single-file migration source for sqlx.
//!
//! All migrations live in one sql file that is embedded into the binary.
//! A migration starts at a header comment of the form
//!
//! ```sql
//! --##1 initial schema
//! ```
//!
//! naming its version (1) and description (initial schema); every line up
//! to the next header belongs to it. Versions must increase by one.
use std::{borrow::Cow, future::Future, pin::Pin};

use sqlx::{
    error::BoxDynError,
    migrate::{Migration, MigrationSource, MigrationType},
};

#[derive(Debug)]
pub struct MigrationScript<'s> {
    data: &'s str,
}

fn parse_header(line: &str) -> Result<Migration, BoxDynError> {
    let version_end = line.find(' ').unwrap_or(line.len());
    let version = line[4..version_end]
        .parse()
        .map_err(|err| format!("cannot parse migration version from '{line}': {err}"))?;
    let description = line[version_end..].trim().to_string();

    Ok(Migration::new(
        version,
        Cow::Owned(description),
        MigrationType::Simple,
        Cow::Owned(String::new()),
    ))
}

impl<'s> MigrationSource<'s> for MigrationScript<'s> {
    fn resolve(self) -> Pin<Box<dyn Future<Output = Result<Vec<Migration>, BoxDynError>> + Send + 's>> {
        Box::pin(async move {
            let mut migrations: Vec<Migration> = Vec::new();

            for line in self.data.lines() {
                if line.trim().is_empty() {
                    continue;
                }

                if line.starts_with("--##") {
                    migrations.push(parse_header(line)?);
                    continue;
                }

                match migrations.last_mut() {
                    Some(migration) => {
                        migration.sql.to_mut().push_str(line);
                        migration.sql.to_mut().push('\n');
                    }
                    // comments may precede the first header
                    None if line.starts_with("--") => continue,
                    None => {
                        return Err(format!(
                            "migration script does not start with a migration header, got: {line}"
                        )
                        .into())
                    }
                }
            }

            Ok(migrations)
        })
    }
}

pub fn postgresql_migrations() -> MigrationScript<'static> {
    MigrationScript {
        data: include_str!("./sql/migrations.pg.sql"),
    }
}

#[cfg(test)]
mod tests {
    use sqlx::migrate::MigrationSource;

    #[tokio::test]
    async fn test_embedded_migrations_parse() {
        let migrations = super::postgresql_migrations().resolve().await.unwrap();

        assert!(!migrations.is_empty());
        for (index, migration) in migrations.iter().enumerate() {
            assert_eq!(migration.version, index as i64 + 1);
            assert!(!migration.sql.trim().is_empty());
        }
    }
}
