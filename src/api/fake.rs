//! In-memory [`DatasetApi`] for store, panel and shell tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{DatasetApi, UploadFile};
use crate::error::{ClientError, ClientResult};
use crate::model::{
    AuthTokens, Dataset, DatasetDetail, DatasetId, DatasetSummary, EquipmentPage,
    EquipmentRecord, Measure, TypeSummary, UploadResponse, User,
};

pub(crate) struct FakeApi {
    datasets: Mutex<Vec<Dataset>>,
    calls: Mutex<Vec<String>>,
    delays: Mutex<HashMap<DatasetId, u64>>,
    pub fail_list: AtomicBool,
}

fn dataset(id: DatasetId, filename: &str, count: u64) -> Dataset {
    Dataset {
        id,
        filename: filename.to_string(),
        upload_timestamp: "2025-01-05T10:00:00".to_string(),
        total_equipment_count: count,
        avg_flowrate: Some(Measure::from("100.00")),
        avg_pressure: None,
        avg_temperature: None,
    }
}

fn http(status: u16, message: &str) -> ClientError {
    ClientError::Http {
        status,
        message: Some(message.to_string()),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            datasets: Mutex::new(vec![dataset(2, "line_b.csv", 2), dataset(1, "line_a.csv", 4)]),
            calls: Mutex::new(Vec::new()),
            delays: Mutex::new(HashMap::new()),
            fail_list: AtomicBool::new(false),
        }
    }

    /// Delay every per-dataset response for `id`
    pub fn delay(&self, id: DatasetId, millis: u64) {
        self.delays.lock().unwrap().insert(id, millis);
    }

    /// Number of recorded calls whose name starts with `prefix`
    pub fn calls(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause(&self, id: DatasetId) {
        let delay = self.delays.lock().unwrap().get(&id).copied();
        if let Some(ms) = delay {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn known(&self, id: DatasetId) -> ClientResult<Dataset> {
        self.datasets
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| http(404, "Not found."))
    }
}

#[async_trait]
impl DatasetApi for FakeApi {
    async fn upload(&self, file: UploadFile) -> ClientResult<UploadResponse> {
        self.record(format!("upload {}", file.filename));
        if file.bytes.is_empty() {
            return Err(http(400, "CSV file is empty."));
        }

        self.datasets
            .lock()
            .unwrap()
            .insert(0, dataset(7, &file.filename, 3));
        Ok(UploadResponse {
            dataset_id: 7,
            filename: file.filename,
            total_equipment_count: 3,
            avg_flowrate: Some(110.0),
            avg_pressure: None,
            avg_temperature: None,
        })
    }

    async fn list_datasets(&self) -> ClientResult<Vec<Dataset>> {
        self.record("list".to_string());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        Ok(self.datasets.lock().unwrap().clone())
    }

    async fn get_dataset(&self, id: DatasetId) -> ClientResult<DatasetDetail> {
        self.record(format!("detail {}", id));
        self.pause(id).await;
        let meta = self.known(id)?;

        let equipment_list = (0..meta.total_equipment_count)
            .map(|i| EquipmentRecord {
                id: Some(i as i64 + 1),
                equipment_name: format!("{}-{}", id, i + 1),
                equipment_type: if i % 2 == 0 { "Pump" } else { "Valve" }.to_string(),
                flowrate: Measure::Number(10.0 * (i + 1) as f64),
                pressure: Measure::from("5.00"),
                temperature: Measure::Missing,
                row_number: Some(i as u32 + 1),
            })
            .collect::<Vec<_>>();
        let pumps = equipment_list.iter().filter(|r| r.equipment_type == "Pump").count() as u64;

        Ok(DatasetDetail {
            id: Some(id),
            filename: Some(meta.filename),
            upload_timestamp: Some(meta.upload_timestamp),
            total_equipment_count: Some(meta.total_equipment_count),
            type_summaries: vec![
                TypeSummary {
                    equipment_type: "Pump".to_string(),
                    count: pumps,
                    avg_flowrate: None,
                    avg_pressure: None,
                    avg_temperature: None,
                },
                TypeSummary {
                    equipment_type: "Valve".to_string(),
                    count: meta.total_equipment_count - pumps,
                    avg_flowrate: None,
                    avg_pressure: None,
                    avg_temperature: None,
                },
            ],
            equipment_list,
        })
    }

    async fn get_dataset_summary(&self, id: DatasetId) -> ClientResult<DatasetSummary> {
        self.record(format!("summary {}", id));
        self.pause(id).await;
        let meta = self.known(id)?;
        Ok(DatasetSummary {
            total_count: meta.total_equipment_count,
            avg_flowrate: Some(id as f64 * 10.0),
            ..Default::default()
        })
    }

    async fn get_equipment_page(&self, id: DatasetId, page: u32) -> ClientResult<EquipmentPage> {
        self.record(format!("page {} {}", id, page));
        let detail = self.get_dataset(id).await?;
        Ok(EquipmentPage {
            count: detail.equipment_list.len() as u64,
            next: None,
            previous: None,
            results: detail.equipment_list,
        })
    }

    async fn generate_pdf(&self, id: DatasetId) -> ClientResult<Vec<u8>> {
        self.record(format!("pdf {}", id));
        self.pause(id).await;
        self.known(id)?;
        Ok(b"%PDF-1.4 fake".to_vec())
    }

    async fn login(&self, username: &str, password: &str) -> ClientResult<AuthTokens> {
        self.record(format!("login {}", username));
        if password != "secret" {
            return Err(http(401, "Invalid credentials"));
        }
        Ok(AuthTokens {
            access: format!("access-{}", username),
            refresh: format!("refresh-{}", username),
            user: None,
        })
    }

    async fn register(
        &self,
        username: &str,
        _password: &str,
        email: Option<&str>,
    ) -> ClientResult<AuthTokens> {
        self.record(format!("register {}", username));
        if username == "taken" {
            return Err(http(400, "Username already exists"));
        }
        Ok(AuthTokens {
            access: format!("access-{}", username),
            refresh: format!("refresh-{}", username),
            user: Some(User {
                id: 9,
                username: username.to_string(),
                email: email.unwrap_or_default().to_string(),
            }),
        })
    }
}
