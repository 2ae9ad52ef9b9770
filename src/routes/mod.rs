pub mod blocks;

pub mod evaluations;

pub mod exams;

pub mod grades;

pub mod students;

pub use blocks::configure_blocks_routes;
pub use evaluations::configure_evaluations_routes;
pub use exams::configure_exams_routes;
pub use grades::configure_grades_routes;
pub use students::configure_students_routes;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.configure(configure_students_routes)
        .configure(configure_blocks_routes)
        .configure(configure_exams_routes)
        .configure(configure_grades_routes)
        .configure(configure_evaluations_routes);
}
