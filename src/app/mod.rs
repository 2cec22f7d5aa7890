// ==========================================
// 汽车服务预约系统 - 应用层
// ==========================================
// 职责: 组装共享连接、仓储与引擎，供外部展示层调用
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
