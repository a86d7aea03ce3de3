//! Repository for staff assignments and their payments.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::entities::{
    CreateAssignmentRequest, PaymentStatus, StaffAssignment, UpdateAssignmentRequest,
};
use crate::repos::StaffRepository;
use crate::rules::payment::{self, AssignmentPayment, StaffCostSummary};
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const ASSIGNMENT_COLUMNS: &str = "id, event_id, staff_id, role, starts_at, ends_at, rate_type, \
                                  rate_cents, payment_terms, payment_status, paid_at, notes, \
                                  created_at, updated_at";

pub struct StaffAssignmentRepository {
    pool: SqlitePool,
}

impl StaffAssignmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Assignments of an event with payment status derived for `today`.
    pub async fn list_for_event(
        &self,
        event_id: &str,
        today: NaiveDate,
    ) -> DatabaseResult<Vec<AssignmentPayment>> {
        let assignments = self.rows_for_event(event_id).await?;
        Ok(assignments
            .into_iter()
            .map(|a| AssignmentPayment::evaluate(a, today))
            .collect())
    }

    pub async fn list_for_staff(
        &self,
        staff_id: &str,
        today: NaiveDate,
    ) -> DatabaseResult<Vec<AssignmentPayment>> {
        let assignments = sqlx::query_as::<_, StaffAssignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM staff_assignments
             WHERE staff_id = ? ORDER BY starts_at"
        ))
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments
            .into_iter()
            .map(|a| AssignmentPayment::evaluate(a, today))
            .collect())
    }

    pub async fn find(&self, id: &str) -> DatabaseResult<Option<StaffAssignment>> {
        let assignment = sqlx::query_as::<_, StaffAssignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM staff_assignments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(assignment)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<StaffAssignment> {
        self.find(id)
            .await?
            .ok_or(DatabaseError::NotFound("Staff assignment"))
    }

    /// Assign a staff member to an event. Role and rate default to the
    /// staff member's directory entry.
    pub async fn create(
        &self,
        event_id: &str,
        request: CreateAssignmentRequest,
    ) -> DatabaseResult<StaffAssignment> {
        let staff = StaffRepository::new(self.pool.clone())
            .find(&request.staff_id)
            .await?
            .ok_or_else(|| DatabaseError::invalid("staff_id", "unknown staff member"))?;
        if !staff.active {
            return Err(DatabaseError::invalid(
                "staff_id",
                "inactive staff members cannot be assigned",
            ));
        }

        let mut assignment = StaffAssignment::from_request(
            cuid2::cuid(),
            event_id,
            staff.hourly_rate_cents,
            request,
            &timestamp(),
        );
        if assignment.role.is_none() {
            assignment.role = Some(staff.role.clone());
        }
        assignment.validate()?;

        sqlx::query(
            "INSERT INTO staff_assignments (id, event_id, staff_id, role, starts_at, ends_at,
                                            rate_type, rate_cents, payment_terms, payment_status,
                                            paid_at, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&assignment.id)
        .bind(&assignment.event_id)
        .bind(&assignment.staff_id)
        .bind(&assignment.role)
        .bind(&assignment.starts_at)
        .bind(&assignment.ends_at)
        .bind(assignment.rate_type.as_str())
        .bind(assignment.rate_cents)
        .bind(assignment.payment_terms.as_str())
        .bind(assignment.payment_status.as_str())
        .bind(&assignment.paid_at)
        .bind(&assignment.notes)
        .bind(&assignment.created_at)
        .bind(&assignment.updated_at)
        .execute(&self.pool)
        .await?;

        info!(
            assignment_id = %assignment.id,
            event_id = %assignment.event_id,
            staff_id = %assignment.staff_id,
            "created staff assignment"
        );
        Ok(assignment)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateAssignmentRequest,
    ) -> DatabaseResult<StaffAssignment> {
        let mut assignment = self.get(id).await?;
        if let Some(requested) = request.payment_status {
            payment::check_transition(assignment.payment_status, requested)?;
        }
        assignment.apply(request);
        assignment.validate()?;
        assignment.updated_at = timestamp();
        self.store(&assignment).await?;

        info!(
            assignment_id = %assignment.id,
            payment_status = %assignment.payment_status,
            "updated staff assignment"
        );
        Ok(assignment)
    }

    /// Record the payment of an assignment.
    pub async fn mark_paid(&self, id: &str) -> DatabaseResult<StaffAssignment> {
        let mut assignment = self.get(id).await?;
        payment::ensure_can_mark_paid(&assignment)?;

        let now = timestamp();
        assignment.payment_status = PaymentStatus::Paid;
        assignment.paid_at = Some(now.clone());
        assignment.updated_at = now;
        self.store(&assignment).await?;

        info!(
            assignment_id = %assignment.id,
            amount_cents = payment::amount_due_cents(&assignment),
            "marked staff assignment paid"
        );
        Ok(assignment)
    }

    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM staff_assignments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Staff assignment"));
        }
        info!(assignment_id = %id, "deleted staff assignment");
        Ok(())
    }

    /// Persist date-driven status changes for every open assignment.
    /// Returns the number of rows whose status changed.
    pub async fn refresh_statuses(&self, today: NaiveDate) -> DatabaseResult<u64> {
        let open = sqlx::query_as::<_, StaffAssignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM staff_assignments
             WHERE payment_status IN ('pending', 'overdue')"
        ))
        .fetch_all(&self.pool)
        .await?;

        let now = timestamp();
        let mut changed = 0;
        for assignment in open {
            let derived = payment::derive_status(&assignment, today);
            if derived == assignment.payment_status {
                continue;
            }
            debug!(
                assignment_id = %assignment.id,
                from = %assignment.payment_status,
                to = %derived,
                "payment status changed"
            );
            changed += sqlx::query(
                "UPDATE staff_assignments SET payment_status = ?, updated_at = ? WHERE id = ?",
            )
            .bind(derived.as_str())
            .bind(&now)
            .bind(&assignment.id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        }

        if changed > 0 {
            info!(changed, "refreshed staff assignment payment statuses");
        }
        Ok(changed)
    }

    pub async fn cost_summary(
        &self,
        event_id: &str,
        today: NaiveDate,
    ) -> DatabaseResult<StaffCostSummary> {
        let assignments = self.rows_for_event(event_id).await?;
        Ok(payment::summarize(&assignments, today))
    }

    async fn rows_for_event(&self, event_id: &str) -> DatabaseResult<Vec<StaffAssignment>> {
        let assignments = sqlx::query_as::<_, StaffAssignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM staff_assignments
             WHERE event_id = ? ORDER BY starts_at"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    async fn store(&self, assignment: &StaffAssignment) -> DatabaseResult<()> {
        sqlx::query(
            "UPDATE staff_assignments
             SET role = ?, starts_at = ?, ends_at = ?, rate_type = ?, rate_cents = ?,
                 payment_terms = ?, payment_status = ?, paid_at = ?, notes = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&assignment.role)
        .bind(&assignment.starts_at)
        .bind(&assignment.ends_at)
        .bind(assignment.rate_type.as_str())
        .bind(assignment.rate_cents)
        .bind(assignment.payment_terms.as_str())
        .bind(assignment.payment_status.as_str())
        .bind(&assignment.paid_at)
        .bind(&assignment.notes)
        .bind(&assignment.updated_at)
        .bind(&assignment.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
