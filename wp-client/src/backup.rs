use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::WpClientResult;

const BACKUP_STUB_TEXT: &str = "Имитация резервной копии WordPress. \
    Для настоящего бэкапа нужен плагин вроде UpdraftPlus.";

/// Пишет файл-заглушку `backup_<ГГГГММДД_ЧЧММСС>.zip` в каталог `backup_dir`.
///
/// Каталог создаётся вместе с родителями, если его ещё нет. Несмотря на
/// расширение, внутри файла обычный текст, а не архив.
pub(crate) async fn write_backup_stub(backup_dir: &Path) -> WpClientResult<PathBuf> {
    tokio::fs::create_dir_all(backup_dir).await?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_file = backup_dir.join(format!("backup_{stamp}.zip"));
    tokio::fs::write(&backup_file, BACKUP_STUB_TEXT).await?;

    Ok(backup_file)
}
