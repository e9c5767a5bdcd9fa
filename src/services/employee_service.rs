use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::Page,
        validation::{is_valid_hhmm, parse_id},
    },
    db::{EmployeeChanges, EmployeeFilter, EmployeeRepository, NewEmployee, UserRepository},
    models::{
        auth::{Role, User},
        employee::{
            Employee, EmployeeKind, EmployeeOverview, EmployeeProfile, ScheduleEntry,
            StaffPosition,
        },
    },
};

// Campos extras aceitos na troca de papel: atualizações de identidade
// (username/phone) e sobrescritas do registro de funcionário.
#[derive(Debug, Default, Clone)]
pub struct SwitchExtra {
    pub username: Option<String>,
    pub phone: Option<String>,
    pub branch_id: Option<String>,
    pub schedule: Option<Vec<ScheduleEntry>>,
    pub position: Option<StaffPosition>,
    pub active: Option<bool>,
}

pub struct AddEmployeeData {
    pub role: String,
    pub branch_id: String,
    pub schedule: Vec<ScheduleEntry>,
    pub position: Option<StaffPosition>,
}

// Reescrita do cache de roles numa troca: sai o papel antigo, entra o novo,
// o resto (user, admin, outros papéis acumulados) fica como está.
fn roles_after_switch(roles: &[Role], from: EmployeeKind, to: EmployeeKind) -> Vec<Role> {
    let mut result: Vec<Role> = roles
        .iter()
        .copied()
        .filter(|r| *r != from.as_role())
        .collect();
    if !result.contains(&to.as_role()) {
        result.push(to.as_role());
    }
    result
}

fn roles_with(roles: &[Role], role: Role) -> Vec<Role> {
    let mut result = roles.to_vec();
    if !result.contains(&role) {
        result.push(role);
    }
    result
}

fn roles_without(roles: &[Role], role: Role) -> Vec<Role> {
    roles.iter().copied().filter(|r| *r != role).collect()
}

// Mescla o registro existente com os extras para o destino da troca:
// extra vence, o resto é carregado do registro. `position` só existe para
// staff; nos outros papéis é descartada.
fn merge_for_switch(
    existing: &Employee,
    extra: &SwitchExtra,
    new_kind: EmployeeKind,
    branch_id: Uuid,
) -> (Uuid, Option<StaffPosition>, Vec<ScheduleEntry>, bool) {
    let schedule = extra
        .schedule
        .clone()
        .unwrap_or_else(|| existing.schedule.0.clone());
    let active = extra.active.unwrap_or(existing.active);
    let position = if new_kind == EmployeeKind::Staff {
        Some(
            extra
                .position
                .or(existing.position)
                .unwrap_or(StaffPosition::Receptionist),
        )
    } else {
        None
    };
    (branch_id, position, schedule, active)
}

fn validate_schedule(schedule: &[ScheduleEntry]) -> Result<(), AppError> {
    if schedule.is_empty() {
        return Err(AppError::Validation("Invalid schedule format".to_string()));
    }
    for entry in schedule {
        if !is_valid_hhmm(&entry.start_time) || !is_valid_hhmm(&entry.end_time) {
            return Err(AppError::Validation(
                "Schedule times must be HH:MM in 24h format".to_string(),
            ));
        }
        if entry.start_time >= entry.end_time {
            return Err(AppError::Validation(
                "Schedule start time must come before end time".to_string(),
            ));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct EmployeeService {
    employee_repo: EmployeeRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(
        employee_repo: EmployeeRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            employee_repo,
            user_repo,
            pool,
        }
    }

    // ------------------------------------------------------------------
    //  Diretório
    // ------------------------------------------------------------------

    // Checagem de existência. Token desconhecido responde false, não erro.
    pub async fn find_employee_exists(&self, role: &str, user_id: &str) -> Result<bool, AppError> {
        let Some(kind) = EmployeeKind::parse(role) else {
            return Ok(false);
        };
        let user_id = parse_id(user_id, "user ID")?;
        self.employee_repo.exists(kind, user_id).await
    }

    pub async fn get_employee_by_user_id(
        &self,
        role: &str,
        user_id: &str,
    ) -> Result<Option<EmployeeProfile>, AppError> {
        let Some(kind) = EmployeeKind::parse(role) else {
            return Ok(None);
        };
        let user_id = parse_id(user_id, "user ID")?;
        self.employee_repo.profile_by_user_and_kind(user_id, kind).await
    }

    pub async fn list_employees(
        &self,
        role: &str,
        filter: &EmployeeFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<EmployeeProfile>, AppError> {
        let Some(kind) = EmployeeKind::parse(role) else {
            // Token desconhecido: resultado vazio, não erro.
            return Ok(Page::new(Vec::new(), 0, page, limit));
        };
        let (items, total) = self
            .employee_repo
            .list_by_kind(kind, filter, limit, (page - 1) * limit)
            .await?;
        Ok(Page::new(items, total, page, limit))
    }

    // Listagem agregada: um registro por usuário com todos os papéis.
    pub async fn list_all_employees(
        &self,
        page: i64,
        limit: i64,
    ) -> Result<Page<EmployeeOverview>, AppError> {
        let (rows, total) = self
            .employee_repo
            .list_overview(limit, (page - 1) * limit)
            .await?;
        let items = rows.into_iter().map(EmployeeOverview::from).collect();
        Ok(Page::new(items, total, page, limit))
    }

    // ------------------------------------------------------------------
    //  Onboarding
    // ------------------------------------------------------------------

    // Promove um usuário (resolvido por e-mail) a um papel de funcionário.
    pub async fn add_employee(
        &self,
        email: &str,
        data: AddEmployeeData,
    ) -> Result<Employee, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let kind = EmployeeKind::parse(&data.role)
            .ok_or_else(|| AppError::Validation("Invalid role".to_string()))?;

        if user.has_role(kind.as_role()) {
            return Err(AppError::Conflict(format!(
                "User already has the {} role",
                kind.as_str()
            )));
        }

        let branch_id = parse_id(&data.branch_id, "branch ID")?;
        validate_schedule(&data.schedule)?;

        let position = match kind {
            EmployeeKind::Staff => Some(data.position.unwrap_or(StaffPosition::Receptionist)),
            _ => {
                if data.position.is_some() {
                    return Err(AppError::Validation(
                        "Position only applies to staff".to_string(),
                    ));
                }
                None
            }
        };

        // Registro + cache de roles na mesma transação.
        let mut tx = self.pool.begin().await?;
        let employee = self
            .employee_repo
            .insert(
                &mut *tx,
                &NewEmployee {
                    user_id: user.id,
                    branch_id,
                    kind,
                    position,
                    schedule: data.schedule,
                },
            )
            .await?;
        self.user_repo
            .set_roles(&mut *tx, user.id, &roles_with(&user.roles, kind.as_role()))
            .await?;
        tx.commit().await?;

        Ok(employee)
    }

    // Criação direta por user id (fluxo administrativo por papel).
    pub async fn create_employee(
        &self,
        role: &str,
        user_id: &str,
        branch_id: &str,
        schedule: Vec<ScheduleEntry>,
        position: Option<StaffPosition>,
    ) -> Result<Employee, AppError> {
        let kind = EmployeeKind::parse(role)
            .ok_or_else(|| AppError::Validation("Invalid role".to_string()))?;
        let parsed_user_id = parse_id(user_id, "user ID")?;
        let branch_id = parse_id(branch_id, "branch ID")?;
        validate_schedule(&schedule)?;

        let user = self
            .user_repo
            .find_by_id(parsed_user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        if self.find_employee_exists(role, user_id).await? {
            return Err(AppError::Conflict(format!(
                "User already is a {}",
                kind.as_str()
            )));
        }

        let position = match kind {
            EmployeeKind::Staff => Some(position.unwrap_or(StaffPosition::Receptionist)),
            _ => {
                if position.is_some() {
                    return Err(AppError::Validation(
                        "Position only applies to staff".to_string(),
                    ));
                }
                None
            }
        };

        let mut tx = self.pool.begin().await?;
        let employee = self
            .employee_repo
            .insert(
                &mut *tx,
                &NewEmployee {
                    user_id: user.id,
                    branch_id,
                    kind,
                    position,
                    schedule,
                },
            )
            .await?;
        self.user_repo
            .set_roles(&mut *tx, user.id, &roles_with(&user.roles, kind.as_role()))
            .await?;
        tx.commit().await?;

        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        role: &str,
        user_id: &str,
        changes: EmployeeChanges,
    ) -> Result<Employee, AppError> {
        let kind = EmployeeKind::parse(role)
            .ok_or_else(|| AppError::Validation("Invalid role".to_string()))?;
        let user_id = parse_id(user_id, "user ID")?;

        if kind != EmployeeKind::Staff && changes.position.is_some() {
            return Err(AppError::Validation(
                "Position only applies to staff".to_string(),
            ));
        }
        if let Some(schedule) = &changes.schedule {
            validate_schedule(schedule)?;
        }

        let record = self
            .employee_repo
            .find_by_user_and_kind(user_id, kind)
            .await?
            .ok_or(AppError::NotFound(kind.title()))?;

        self.employee_repo
            .update(record.id, &changes)
            .await?
            .ok_or(AppError::NotFound(kind.title()))
    }

    // ------------------------------------------------------------------
    //  Troca e remoção de papel
    // ------------------------------------------------------------------

    // Troca de papel numa transação de verdade: o registro muda de
    // discriminante e o cache de roles é reescrito juntos; qualquer falha
    // desfaz tudo. (O modelo antigo movia o registro entre coleções com
    // rollback compensatório manual.)
    pub async fn switch_role(
        &self,
        user_id: &str,
        current_role: &str,
        new_role: &str,
        extra: SwitchExtra,
    ) -> Result<(User, Employee), AppError> {
        let (Some(current), Some(new)) = (
            EmployeeKind::parse(current_role),
            EmployeeKind::parse(new_role),
        ) else {
            return Err(AppError::Validation("Invalid role(s)".to_string()));
        };

        let user_id = parse_id(user_id, "user ID")?;
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let record = self
            .employee_repo
            .find_by_user_and_kind(user_id, current)
            .await?
            .ok_or(AppError::NotFound(current.title()))?;

        if let Some(schedule) = &extra.schedule {
            validate_schedule(schedule)?;
        }
        let branch_id = match &extra.branch_id {
            Some(raw) => parse_id(raw, "branch ID")?,
            None => record.branch_id,
        };

        // Atualizações de identidade valem independente da troca em si.
        if extra.username.is_some() || extra.phone.is_some() {
            user = self
                .user_repo
                .update_profile(user_id, extra.username.as_deref(), extra.phone.as_deref())
                .await?
                .ok_or(AppError::NotFound("User"))?;
        }

        // Mesmo papel: só uma atualização in-place, sem mexer em roles.
        if current == new {
            let employee = self
                .employee_repo
                .update(
                    record.id,
                    &EmployeeChanges {
                        branch_id: extra.branch_id.as_deref().map(|_| branch_id),
                        position: extra.position,
                        schedule: extra.schedule.clone(),
                        active: extra.active,
                    },
                )
                .await?
                .ok_or(AppError::NotFound(current.title()))?;
            return Ok((user, employee));
        }

        let (branch_id, position, schedule, active) =
            merge_for_switch(&record, &extra, new, branch_id);
        let new_roles = roles_after_switch(&user.roles, current, new);

        let mut tx = self.pool.begin().await?;
        let employee = self
            .employee_repo
            .switch_kind(
                &mut *tx,
                record.id,
                new,
                branch_id,
                position,
                &schedule,
                active,
            )
            .await?;
        self.user_repo
            .set_roles(&mut *tx, user.id, &new_roles)
            .await?;
        tx.commit().await?;

        user.roles = new_roles;
        Ok((user, employee))
    }

    pub async fn remove_employee(&self, user_id: &str, role: &str) -> Result<(), AppError> {
        let kind = EmployeeKind::parse(role)
            .ok_or_else(|| AppError::Validation("Invalid role".to_string()))?;
        let user_id = parse_id(user_id, "user ID")?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let record = self
            .employee_repo
            .find_by_user_and_kind(user_id, kind)
            .await?
            .ok_or(AppError::NotFound(kind.title()))?;

        let mut tx = self.pool.begin().await?;
        self.employee_repo.delete(&mut *tx, record.id).await?;
        self.user_repo
            .set_roles(&mut *tx, user.id, &roles_without(&user.roles, kind.as_role()))
            .await?;
        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;
    use crate::models::employee::Weekday;

    fn sample_employee(kind: EmployeeKind, position: Option<StaffPosition>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            kind,
            position,
            schedule: Json(vec![ScheduleEntry {
                day: Weekday::Monday,
                start_time: "08:00".to_string(),
                end_time: "17:00".to_string(),
            }]),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn switch_rewrites_only_the_two_role_tokens() {
        let roles = vec![Role::User, Role::Stylist];
        let result = roles_after_switch(&roles, EmployeeKind::Stylist, EmployeeKind::Staff);
        assert_eq!(result, vec![Role::User, Role::Staff]);
    }

    #[test]
    fn switch_preserves_unrelated_accumulated_roles() {
        let roles = vec![Role::User, Role::Stylist, Role::Cashier, Role::Admin];
        let result = roles_after_switch(&roles, EmployeeKind::Stylist, EmployeeKind::Staff);
        assert_eq!(result, vec![Role::User, Role::Cashier, Role::Admin, Role::Staff]);
    }

    #[test]
    fn switch_does_not_duplicate_an_already_held_target_role() {
        let roles = vec![Role::User, Role::Stylist, Role::Staff];
        let result = roles_after_switch(&roles, EmployeeKind::Stylist, EmployeeKind::Staff);
        assert_eq!(result, vec![Role::User, Role::Staff]);
    }

    #[test]
    fn roles_with_and_without_are_inverses_on_the_cache() {
        let roles = vec![Role::User];
        let grown = roles_with(&roles, Role::Cashier);
        assert_eq!(grown, vec![Role::User, Role::Cashier]);
        assert_eq!(roles_with(&grown, Role::Cashier), grown);
        assert_eq!(roles_without(&grown, Role::Cashier), vec![Role::User]);
    }

    #[test]
    fn merge_carries_over_branch_and_schedule_when_extra_is_empty() {
        let existing = sample_employee(EmployeeKind::Stylist, None);
        let extra = SwitchExtra::default();
        let (branch_id, position, schedule, active) =
            merge_for_switch(&existing, &extra, EmployeeKind::Staff, existing.branch_id);

        assert_eq!(branch_id, existing.branch_id);
        // Destino staff sem position explícita: padrão receptionist.
        assert_eq!(position, Some(StaffPosition::Receptionist));
        assert_eq!(schedule, existing.schedule.0);
        assert!(active);
    }

    #[test]
    fn merge_prefers_extra_fields_over_existing_ones() {
        let existing = sample_employee(EmployeeKind::Stylist, None);
        let extra = SwitchExtra {
            position: Some(StaffPosition::Manager),
            active: Some(false),
            schedule: Some(vec![ScheduleEntry {
                day: Weekday::Saturday,
                start_time: "10:00".to_string(),
                end_time: "14:00".to_string(),
            }]),
            ..Default::default()
        };
        let (_, position, schedule, active) =
            merge_for_switch(&existing, &extra, EmployeeKind::Staff, existing.branch_id);

        assert_eq!(position, Some(StaffPosition::Manager));
        assert_eq!(schedule[0].day, Weekday::Saturday);
        assert!(!active);
    }

    #[test]
    fn merge_drops_position_when_leaving_staff() {
        let existing = sample_employee(EmployeeKind::Staff, Some(StaffPosition::Manager));
        let extra = SwitchExtra::default();
        let (_, position, _, _) =
            merge_for_switch(&existing, &extra, EmployeeKind::Cashier, existing.branch_id);
        assert_eq!(position, None);
    }

    #[test]
    fn schedule_validation_rejects_empty_and_malformed_windows() {
        assert!(validate_schedule(&[]).is_err());

        let bad_time = vec![ScheduleEntry {
            day: Weekday::Monday,
            start_time: "8:00".to_string(),
            end_time: "17:00".to_string(),
        }];
        assert!(validate_schedule(&bad_time).is_err());

        let inverted = vec![ScheduleEntry {
            day: Weekday::Monday,
            start_time: "17:00".to_string(),
            end_time: "08:00".to_string(),
        }];
        assert!(validate_schedule(&inverted).is_err());

        let ok = vec![ScheduleEntry {
            day: Weekday::Monday,
            start_time: "08:00".to_string(),
            end_time: "17:00".to_string(),
        }];
        assert!(validate_schedule(&ok).is_ok());
    }
}
