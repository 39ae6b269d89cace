use crate::utils::error::Result;

/// 檔案存取介面，路徑相對於儲存根目錄
pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn base_dir(&self) -> &str;
    fn data_file(&self) -> &str;
    fn report_file(&self) -> &str;
}
