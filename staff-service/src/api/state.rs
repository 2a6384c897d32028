use std::sync::Arc;

use crate::domain::service::StaffService;

pub struct StaffServiceAppState {
    pub staff_service: Arc<StaffService>,
}
