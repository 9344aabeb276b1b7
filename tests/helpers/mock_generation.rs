// ==========================================
// Mock 生成服务 - 用于集成测试
// ==========================================
// 按提示词中的标记返回脚本化响应,并记录调用与并发度
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use spinning_advisor::domain::types::SectionSlot;
use spinning_advisor::generation::{Credentials, GenerationClient, GenerationError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Scripted = Result<String, GenerationError>;

pub struct ScriptedClient {
    rules: Vec<(String, Scripted)>,
    fallback: Scripted,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, String)>>, // (prompt, model_id)
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedClient {
    /// 所有调用返回同一结果
    pub fn always(response: Scripted) -> Self {
        Self {
            rules: Vec::new(),
            fallback: response,
            delay: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn text(response: &str) -> Self {
        Self::always(Ok(response.to_string()))
    }

    /// 每个多代理栏位返回 "<slot> body"；指定栏位返回给定结果
    pub fn per_topic(overrides: Vec<(SectionSlot, Scripted)>) -> Self {
        let mut rules: Vec<(String, Scripted)> = overrides
            .into_iter()
            .map(|(slot, result)| (topic_marker(slot), result))
            .collect();
        for slot in SectionSlot::ALL.iter() {
            rules.push((topic_marker(*slot), Ok(format!("{} body", slot))));
        }

        let mut client = Self::always(Err(GenerationError::Transport(
            "no scripted response".to_string(),
        )));
        client.rules = rules;
        client
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    pub fn model_ids(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, model)| model.clone())
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// 多代理提示词中标识栏位的行
pub fn topic_marker(slot: SectionSlot) -> String {
    format!("SECTION: {}", slot.title())
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        _credentials: &Credentials,
    ) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), model_id.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.rules
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
