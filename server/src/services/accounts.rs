//! Account persistence behind the `AccountStore` seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every account lives in one `registro_usuarios` row. Sign-in looks rows up
//! by provider id or email, links providers and creates accounts; profile
//! updates rewrite a whitelisted set of columns.
//!
//! DESIGN
//! ======
//! Route handlers and services depend on `AccountStore`, not on a pool, so
//! they can be exercised against an in-memory store in tests. The `MySQL`
//! implementation builds its `UPDATE` from `ProfileColumn`, a closed set of
//! column names, and binds every value.

use async_trait::async_trait;
use profiles::ProfileField;
use sqlx::{MySqlPool, Row};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

// =============================================================================
// COLUMNS
// =============================================================================

/// Writable `registro_usuarios` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileColumn {
    Email,
    Telefono,
    NombreUsuario,
    NombreEmpresa,
    Habilidades,
    Experiencia,
    Website,
    DescripcionEmpresa,
    Categoria,
    AnoFundacion,
    TamanoEmpresa,
    Logo,
    Ubicacion,
    Direccion,
}

impl ProfileColumn {
    /// Column written for a profile field, if the field is writable.
    #[must_use]
    pub fn for_field(field: ProfileField) -> Option<Self> {
        Some(match field {
            ProfileField::Email => Self::Email,
            ProfileField::Phone => Self::Telefono,
            ProfileField::FullName => Self::NombreUsuario,
            ProfileField::CompanyName => Self::NombreEmpresa,
            ProfileField::Skills => Self::Habilidades,
            ProfileField::Experience => Self::Experiencia,
            ProfileField::Website => Self::Website,
            ProfileField::CompanyDescription => Self::DescripcionEmpresa,
            ProfileField::Category => Self::Categoria,
            ProfileField::FoundedYear => Self::AnoFundacion,
            ProfileField::CompanySize => Self::TamanoEmpresa,
            ProfileField::Logo => Self::Logo,
            ProfileField::Location => Self::Ubicacion,
            ProfileField::Address => Self::Direccion,
            ProfileField::Id | ProfileField::UserType | ProfileField::Token => return None,
        })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Telefono => "telefono",
            Self::NombreUsuario => "nombre_usuario",
            Self::NombreEmpresa => "nombre_empresa",
            Self::Habilidades => "habilidades",
            Self::Experiencia => "experiencia",
            Self::Website => "website",
            Self::DescripcionEmpresa => "descripcion_empresa",
            Self::Categoria => "categoria",
            Self::AnoFundacion => "ano_fundacion",
            Self::TamanoEmpresa => "tamano_empresa",
            Self::Logo => "logo",
            Self::Ubicacion => "ubicacion",
            Self::Direccion => "direccion",
        }
    }
}

// =============================================================================
// ROWS
// =============================================================================

/// The columns of an account row that sign-in needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    pub id: u64,
    pub email: String,
    pub nombre_usuario: Option<String>,
    pub nombre_empresa: Option<String>,
    pub tipo_usuario: String,
    pub google_id: Option<String>,
    pub verificado: bool,
}

impl AccountRow {
    /// `nombre_usuario`, falling back to `nombre_empresa` when empty.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        [self.nombre_usuario.as_deref(), self.nombre_empresa.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
    }

    #[must_use]
    pub fn needs_provider_link(&self) -> bool {
        self.google_id.as_deref().is_none_or(str::is_empty) || !self.verificado
    }
}

/// Row inserted for a first-time provider sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub nombre_usuario: String,
    pub email: String,
    pub password_hash: String,
    pub tipo_usuario: String,
    pub google_id: String,
    pub telefono: String,
    pub codigo_pais: String,
}

// =============================================================================
// STORE
// =============================================================================

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// First row whose provider id or email matches.
    async fn find_by_provider_or_email(&self, provider_id: &str, email: &str)
    -> Result<Option<AccountRow>, AccountError>;

    /// Record `provider_id` on the account and mark it verified.
    async fn link_provider(&self, id: u64, provider_id: &str) -> Result<(), AccountError>;

    /// Insert a verified account and return its id.
    async fn create(&self, account: &NewAccount) -> Result<u64, AccountError>;

    /// Set the given columns on the account. Returns the number of rows
    /// changed, which is 0 both for an unknown id and for unchanged values.
    async fn update_columns(&self, id: u64, columns: &[(ProfileColumn, String)]) -> Result<u64, AccountError>;
}

pub struct MySqlAccountStore {
    pool: MySqlPool,
}

impl MySqlAccountStore {
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for MySqlAccountStore {
    async fn find_by_provider_or_email(
        &self,
        provider_id: &str,
        email: &str,
    ) -> Result<Option<AccountRow>, AccountError> {
        let row = sqlx::query(
            r"SELECT id, email, nombre_usuario, nombre_empresa, tipo_usuario, google_id, verificado
              FROM registro_usuarios
              WHERE google_id = ? OR email = ?
              ORDER BY (google_id = ?) DESC, id
              LIMIT 1",
        )
        .bind(provider_id)
        .bind(email)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| AccountRow {
            id: r.get("id"),
            email: r.get("email"),
            nombre_usuario: r.get("nombre_usuario"),
            nombre_empresa: r.get("nombre_empresa"),
            tipo_usuario: r.get("tipo_usuario"),
            google_id: r.get("google_id"),
            verificado: r.get("verificado"),
        }))
    }

    async fn link_provider(&self, id: u64, provider_id: &str) -> Result<(), AccountError> {
        sqlx::query("UPDATE registro_usuarios SET google_id = ?, verificado = 1 WHERE id = ?")
            .bind(provider_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create(&self, account: &NewAccount) -> Result<u64, AccountError> {
        let result = sqlx::query(
            r"INSERT INTO registro_usuarios
                (nombre_usuario, email, password, tipo_usuario, verificado, google_id, fecha_registro, telefono, codigo_pais)
              VALUES (?, ?, ?, ?, 1, ?, NOW(), ?, ?)",
        )
        .bind(&account.nombre_usuario)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.tipo_usuario)
        .bind(&account.google_id)
        .bind(&account.telefono)
        .bind(&account.codigo_pais)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_id())
    }

    async fn update_columns(&self, id: u64, columns: &[(ProfileColumn, String)]) -> Result<u64, AccountError> {
        if columns.is_empty() {
            return Ok(0);
        }
        let sql = update_sql(columns.iter().map(|(column, _)| *column));
        let query = columns
            .iter()
            .fold(sqlx::query(&sql), |query, (_, value)| query.bind(value))
            .bind(id);
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// `UPDATE registro_usuarios SET a = ?, b = ? WHERE id = ?`
pub(crate) fn update_sql(columns: impl Iterator<Item = ProfileColumn>) -> String {
    let assignments: Vec<String> = columns.map(|column| format!("{} = ?", column.as_str())).collect();
    format!("UPDATE registro_usuarios SET {} WHERE id = ?", assignments.join(", "))
}

#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;
