use chrono::{DateTime, NaiveDate, Utc};
use juiceville_shared::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

// ============================================================================
// Customers
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: Masked<String>,
    pub email: Masked<String>,
    pub loyalty_points: u32,
    pub delivery_zone_id: Option<Uuid>,
    pub date_of_birth: Option<NaiveDate>,
    pub marketing_consent: bool,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// A freshly signed-up customer with an empty profile.
    pub fn new(email: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            address: String::new(),
            phone: Masked::default(),
            email: Masked::from(email),
            loyalty_points: 0,
            delivery_zone_id: None,
            date_of_birth: None,
            marketing_consent: false,
            joined_at: now,
            updated_at: now,
        }
    }

    /// Profile fields that must be filled before an order can be placed.
    pub fn missing_profile_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.phone.is_blank() {
            missing.push("phone");
        }
        if self.address.trim().is_empty() {
            missing.push("address");
        }
        if self.delivery_zone_id.is_none() {
            missing.push("delivery_zone");
        }
        missing
    }

    pub fn is_profile_complete(&self) -> bool {
        self.missing_profile_fields().is_empty()
    }

    pub fn has_phone(&self) -> bool {
        !self.phone.is_blank()
    }
}

// ============================================================================
// Staff & permissions
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Designation {
    #[serde(rename = "MD")]
    ManagingDirector,
    #[serde(rename = "MG")]
    Manager,
    #[serde(rename = "CS")]
    CustomerService,
    #[serde(rename = "KS")]
    KitchenStaff,
    #[serde(rename = "DL")]
    Delivery,
    #[serde(rename = "AC")]
    Accounts,
    #[serde(rename = "AD")]
    Admin,
}

impl Designation {
    pub fn code(&self) -> &'static str {
        match self {
            Designation::ManagingDirector => "MD",
            Designation::Manager => "MG",
            Designation::CustomerService => "CS",
            Designation::KitchenStaff => "KS",
            Designation::Delivery => "DL",
            Designation::Accounts => "AC",
            Designation::Admin => "AD",
        }
    }
}

/// Staff-only operations, each gated on a fixed set of designations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    CloseOrders,
    UpdateStock,
    SalesSheet,
    TodaysOrders,
    PendingDashboard,
    ViewOrderDetails,
    ManageCatalog,
    ManageCustomers,
}

impl Permission {
    pub fn designations(&self) -> &'static [Designation] {
        use Designation::*;
        match self {
            Permission::CloseOrders | Permission::UpdateStock => {
                &[CustomerService, KitchenStaff, Manager, ManagingDirector]
            }
            Permission::SalesSheet => &[
                CustomerService,
                KitchenStaff,
                Delivery,
                Accounts,
                Admin,
                Manager,
                ManagingDirector,
            ],
            Permission::TodaysOrders => {
                &[ManagingDirector, Manager, CustomerService, KitchenStaff, Delivery]
            }
            Permission::PendingDashboard => {
                &[CustomerService, Admin, ManagingDirector, KitchenStaff, Delivery]
            }
            Permission::ViewOrderDetails => &[
                CustomerService,
                KitchenStaff,
                Delivery,
                Manager,
                ManagingDirector,
                Admin,
            ],
            Permission::ManageCatalog | Permission::ManageCustomers => {
                &[ManagingDirector, Manager]
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub emp_id: String,
    pub name: String,
    pub designation: Designation,
    pub phone: Masked<String>,
    pub email: Masked<String>,
    #[serde(default)]
    pub is_superuser: bool,
}

impl Staff {
    pub fn new(emp_id: &str, name: &str, designation: Designation) -> Self {
        Self {
            id: Uuid::new_v4(),
            emp_id: emp_id.to_string(),
            name: name.to_string(),
            designation,
            phone: Masked::default(),
            email: Masked::default(),
            is_superuser: false,
        }
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.is_superuser || permission.designations().contains(&self.designation)
    }

    pub fn require(&self, permission: Permission) -> CoreResult<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "{} ({}) may not perform {:?}",
                self.name,
                self.designation.code(),
                permission
            )))
        }
    }
}
