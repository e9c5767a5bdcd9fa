use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, types::Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::employee::{
        Employee, EmployeeKind, EmployeeOverviewRow, EmployeeProfile, ScheduleEntry,
        StaffPosition, Weekday,
    },
};

// Filtro das listagens por papel, montado a partir dos query params.
// O filtro de agenda exige que a janela do registro CONTENHA a janela
// pedida: startTime <= start e endTime >= end no dia dado.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub branch_id: Option<Uuid>,
    pub positions: Vec<StaffPosition>,
    pub active: Option<bool>,
    pub day: Option<Weekday>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl EmployeeFilter {
    fn has_schedule_clause(&self) -> bool {
        self.day.is_some() || self.start.is_some() || self.end.is_some()
    }
}

const PROFILE_COLUMNS: &str = r#"
    e.id, e.user_id, e.kind, e.position, e.schedule, e.active, e.created_at,
    u.username, u.email, u.phone,
    b.id AS branch_id, b.name AS branch_name, b.address AS branch_address
"#;

const PROFILE_JOINS: &str = r#"
    FROM employees e
    JOIN users u ON u.id = e.user_id
    JOIN branches b ON b.id = e.branch_id
"#;

// Acrescenta as cláusulas WHERE compartilhadas entre a listagem e o COUNT.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, kind: EmployeeKind, filter: &EmployeeFilter) {
    qb.push(" WHERE e.kind = ");
    qb.push_bind(kind);

    if let Some(branch_id) = filter.branch_id {
        qb.push(" AND e.branch_id = ");
        qb.push_bind(branch_id);
    }

    if !filter.positions.is_empty() {
        qb.push(" AND e.position = ANY(");
        qb.push_bind(filter.positions.clone());
        qb.push(")");
    }

    if let Some(active) = filter.active {
        qb.push(" AND e.active = ");
        qb.push_bind(active);
    }

    if filter.has_schedule_clause() {
        qb.push(" AND EXISTS (SELECT 1 FROM jsonb_array_elements(e.schedule) s WHERE TRUE");
        if let Some(day) = filter.day {
            qb.push(" AND s->>'day' = ");
            qb.push_bind(day.as_str());
        }
        if let Some(start) = &filter.start {
            qb.push(" AND s->>'startTime' <= ");
            qb.push_bind(start.clone());
        }
        if let Some(end) = &filter.end {
            qb.push(" AND s->>'endTime' >= ");
            qb.push_bind(end.clone());
        }
        qb.push(")");
    }
}

pub struct NewEmployee {
    pub user_id: Uuid,
    pub branch_id: Uuid,
    pub kind: EmployeeKind,
    pub position: Option<StaffPosition>,
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Default)]
pub struct EmployeeChanges {
    pub branch_id: Option<Uuid>,
    pub position: Option<StaffPosition>,
    pub schedule: Option<Vec<ScheduleEntry>>,
    pub active: Option<bool>,
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        new: &NewEmployee,
    ) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"INSERT INTO employees (user_id, branch_id, kind, position, schedule)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(new.user_id)
        .bind(new.branch_id)
        .bind(new.kind)
        .bind(new.position)
        .bind(Json(new.schedule.clone()))
        .fetch_one(conn)
        .await
        .map_err(|e| {
            // UNIQUE (user_id, kind): o usuário já tem esse papel.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(format!(
                        "User already is a {}",
                        new.kind.as_str()
                    ));
                }
            }
            AppError::Database(e)
        })
    }

    pub async fn exists(&self, kind: EmployeeKind, user_id: Uuid) -> Result<bool, AppError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM employees WHERE kind = $1 AND user_id = $2)",
        )
        .bind(kind)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    pub async fn find_by_user_and_kind(
        &self,
        user_id: Uuid,
        kind: EmployeeKind,
    ) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE user_id = $1 AND kind = $2",
        )
        .bind(user_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    pub async fn profile_by_user_and_kind(
        &self,
        user_id: Uuid,
        kind: EmployeeKind,
    ) -> Result<Option<EmployeeProfile>, AppError> {
        let mut sql = String::from("SELECT ");
        sql.push_str(PROFILE_COLUMNS);
        sql.push_str(PROFILE_JOINS);
        sql.push_str(" WHERE e.user_id = $1 AND e.kind = $2");

        let profile = sqlx::query_as::<_, EmployeeProfile>(&sql)
            .bind(user_id)
            .bind(kind)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    pub async fn list_by_kind(
        &self,
        kind: EmployeeKind,
        filter: &EmployeeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<EmployeeProfile>, i64), AppError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT ");
        qb.push(PROFILE_COLUMNS);
        qb.push(PROFILE_JOINS);
        push_filter(&mut qb, kind, filter);
        qb.push(" ORDER BY e.created_at DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let items = qb
            .build_query_as::<EmployeeProfile>()
            .fetch_all(&self.pool)
            .await?;

        let mut count_qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM employees e");
        push_filter(&mut count_qb, kind, filter);
        let total: (i64,) = count_qb.build_query_as().fetch_one(&self.pool).await?;

        Ok((items, total.0))
    }

    // Listagem agregada: uma linha por usuário (o registro mais recente
    // representa), com o conjunto completo de papéis ao lado.
    pub async fn list_overview(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<EmployeeOverviewRow>, i64), AppError> {
        let rows = sqlx::query_as::<_, EmployeeOverviewRow>(
            r#"SELECT * FROM (
                   SELECT DISTINCT ON (e.user_id)
                       e.user_id,
                       u.username,
                       u.email,
                       u.phone,
                       u.roles AS user_roles,
                       e.kind AS role_type,
                       (SELECT array_agg(e2.kind) FROM employees e2 WHERE e2.user_id = e.user_id)
                           AS all_roles,
                       e.schedule,
                       e.active,
                       e.created_at,
                       b.id AS branch_id,
                       b.name AS branch_name
                   FROM employees e
                   JOIN users u ON u.id = e.user_id
                   LEFT JOIN branches b ON b.id = e.branch_id
                   ORDER BY e.user_id, e.created_at DESC
               ) grouped
               ORDER BY grouped.created_at DESC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(DISTINCT user_id) FROM employees")
                .fetch_one(&self.pool)
                .await?;

        Ok((rows, total.0))
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: &EmployeeChanges,
    ) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"UPDATE employees
               SET branch_id = COALESCE($2, branch_id),
                   position = COALESCE($3, position),
                   schedule = COALESCE($4, schedule),
                   active = COALESCE($5, active)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(changes.branch_id)
        .bind(changes.position)
        .bind(changes.schedule.clone().map(Json))
        .bind(changes.active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    // Troca de papel: uma única linha muda de discriminante, com os campos
    // já mesclados pelo serviço. Roda dentro da transação da troca.
    pub async fn switch_kind(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        new_kind: EmployeeKind,
        branch_id: Uuid,
        position: Option<StaffPosition>,
        schedule: &[ScheduleEntry],
        active: bool,
    ) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"UPDATE employees
               SET kind = $2, branch_id = $3, position = $4, schedule = $5, active = $6
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(new_kind)
        .bind(branch_id)
        .bind(position)
        .bind(Json(schedule.to_vec()))
        .bind(active)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(format!(
                        "User already is a {}",
                        new_kind.as_str()
                    ));
                }
            }
            AppError::Database(e)
        })
    }

    pub async fn delete(&self, conn: &mut PgConnection, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(kind: EmployeeKind, filter: &EmployeeFilter) -> String {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM employees e");
        push_filter(&mut qb, kind, filter);
        qb.sql().to_string()
    }

    #[test]
    fn filter_without_options_only_constrains_kind() {
        let sql = sql_for(EmployeeKind::Stylist, &EmployeeFilter::default());
        assert!(sql.ends_with("WHERE e.kind = $1"));
    }

    #[test]
    fn filter_with_branch_and_active_adds_clauses() {
        let filter = EmployeeFilter {
            branch_id: Some(Uuid::nil()),
            active: Some(true),
            ..Default::default()
        };
        let sql = sql_for(EmployeeKind::Staff, &filter);
        assert!(sql.contains("e.branch_id = $2"));
        assert!(sql.contains("e.active = $3"));
        assert!(!sql.contains("jsonb_array_elements"));
    }

    #[test]
    fn schedule_filter_requires_containment_of_requested_window() {
        let filter = EmployeeFilter {
            day: Some(Weekday::Monday),
            start: Some("09:00".to_string()),
            end: Some("11:00".to_string()),
            ..Default::default()
        };
        let sql = sql_for(EmployeeKind::Stylist, &filter);
        assert!(sql.contains("jsonb_array_elements(e.schedule)"));
        assert!(sql.contains("s->>'day' = $2"));
        // A janela do registro deve conter a janela pedida.
        assert!(sql.contains("s->>'startTime' <= $3"));
        assert!(sql.contains("s->>'endTime' >= $4"));
    }

    #[test]
    fn partial_schedule_filter_still_builds_the_exists_clause() {
        let filter = EmployeeFilter {
            day: Some(Weekday::Friday),
            ..Default::default()
        };
        let sql = sql_for(EmployeeKind::Cashier, &filter);
        assert!(sql.contains("EXISTS"));
        assert!(sql.contains("s->>'day' = $2"));
        assert!(!sql.contains("startTime"));
    }
}
