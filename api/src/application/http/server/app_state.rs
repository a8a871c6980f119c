use std::sync::Arc;

use meallog_core::application::MealLogService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: MealLogService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: MealLogService) -> Self {
        Self { args, service }
    }
}
