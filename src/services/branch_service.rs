use crate::{
    common::{error::AppError, validation::parse_id},
    db::BranchRepository,
    models::branch::{Branch, BranchDetails},
};

#[derive(Clone)]
pub struct BranchService {
    branch_repo: BranchRepository,
}

impl BranchService {
    pub fn new(branch_repo: BranchRepository) -> Self {
        Self { branch_repo }
    }

    pub async fn create_branch(
        &self,
        name: &str,
        address: &str,
        phone: &str,
        manager_id: Option<&str>,
    ) -> Result<BranchDetails, AppError> {
        let manager_id = manager_id
            .map(|raw| parse_id(raw, "manager ID"))
            .transpose()?;

        let branch = self
            .branch_repo
            .insert(name, address, phone, manager_id)
            .await?;

        self.branch_repo
            .details_by_id(branch.id)
            .await?
            .ok_or(AppError::NotFound("Branch"))
    }

    pub async fn get_all_branches(&self) -> Result<Vec<BranchDetails>, AppError> {
        self.branch_repo.list().await
    }

    pub async fn get_branch_by_id(&self, id: &str) -> Result<BranchDetails, AppError> {
        let id = parse_id(id, "branch ID")?;
        self.branch_repo
            .details_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Branch"))
    }

    pub async fn update_branch(
        &self,
        id: &str,
        name: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
        manager_id: Option<&str>,
    ) -> Result<Branch, AppError> {
        let id = parse_id(id, "branch ID")?;
        let manager_id = manager_id
            .map(|raw| parse_id(raw, "manager ID"))
            .transpose()?;

        self.branch_repo
            .update(id, name, address, phone, manager_id)
            .await?
            .ok_or(AppError::NotFound("Branch"))
    }

    pub async fn delete_branch(&self, id: &str) -> Result<(), AppError> {
        let id = parse_id(id, "branch ID")?;
        let deleted = self.branch_repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Branch"));
        }
        Ok(())
    }
}
