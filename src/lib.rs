// 码上放心追溯码批量处理工具
//
// 粘贴追溯码 → 拆分粘连码 → 保序去重 → 按企业导出 xlsx

mod atomic_file;
pub mod clipboard_manager;
pub mod config;
pub mod error;
pub mod folder_opener;
pub mod form;
pub mod shell;
pub mod trace_codes;
pub mod xlsx_export;

use config::{AppConfig, ConfigStore};
use form::FormController;
use shell::Shell;

pub fn run() {
    // 初始化日志（写到 stderr，stdout 留给交互界面）
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Err(e) = run_shell() {
        tracing::error!("程序异常结束: {:#}", e);
        eprintln!("❌ 错误: {:#}", e);
    }
}

fn run_shell() -> anyhow::Result<()> {
    let store = ConfigStore::default_location().unwrap_or_else(|e| {
        tracing::warn!("{}，配置将保存在当前目录", e);
        ConfigStore::new("settings.json")
    });

    let (config, fell_back) = store.load().unwrap_or_else(|e| {
        tracing::warn!("加载配置失败: {}, 使用默认值", e);
        (AppConfig::new(), false)
    });
    if fell_back {
        if let Err(e) = store.save(&config) {
            tracing::warn!("重写配置文件失败: {}", e);
        }
    }

    let form = FormController::new(config, store, folder_opener::for_host());

    let stdin = std::io::stdin();
    let mut shell = Shell::new(stdin.lock(), std::io::stdout(), form);
    shell.run()
}
