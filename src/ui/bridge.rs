/// chrome.* services behind the storage and tab traits

use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use web_sys::HtmlInputElement;

use crate::error::{StoreError, TabError};
use crate::link_data::TabInfo;
use crate::operations::ImportFile;
use crate::storage::KeyValueStore;
use crate::tabs::TabService;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeStorage(key: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryAllTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str, active: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn readSelectedFiles(input: &HtmlInputElement) -> Result<JsValue, JsValue>;
}

/// `chrome.storage.local`
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeStorage;

impl KeyValueStore for ChromeStorage {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StoreError> {
        let keys_js = serde_wasm_bindgen::to_value(keys)
            .map_err(|e| StoreError::Request(format!("Failed to serialize keys: {:?}", e)))?;

        let data_js = getStorage(keys_js)
            .await
            .map_err(|e| StoreError::Request(format!("Failed to get storage: {:?}", e)))?;

        if data_js.is_null() || data_js.is_undefined() {
            return Ok(Map::new());
        }
        serde_wasm_bindgen::from_value(data_js).map_err(|e| StoreError::Decode(format!("{:?}", e)))
    }

    async fn set(&self, items: Map<String, Value>) -> Result<(), StoreError> {
        // plain objects, not JS Maps, or chrome.storage drops the contents
        let items_js = items
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StoreError::Encode {
                key: items.keys().cloned().collect::<Vec<_>>().join(","),
                message: format!("{:?}", e),
            })?;

        setStorage(items_js)
            .await
            .map_err(|e| StoreError::Request(format!("Failed to save storage: {:?}", e)))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        removeStorage(key)
            .await
            .map_err(|e| StoreError::Request(format!("Failed to remove {}: {:?}", key, e)))
    }
}

/// `chrome.tabs`
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeTabs;

impl TabService for ChromeTabs {
    async fn query_tabs(&self) -> Result<Vec<TabInfo>, TabError> {
        let tabs_js = queryAllTabs()
            .await
            .map_err(|e| TabError::Query(format!("{:?}", e)))?;

        serde_wasm_bindgen::from_value(tabs_js).map_err(|e| TabError::Query(format!("Failed to parse tabs: {:?}", e)))
    }

    async fn open_tab(&self, url: &str, active: bool) -> Result<(), TabError> {
        openTab(url, active).await.map_err(|e| TabError::Open {
            url: url.to_string(),
            message: format!("{:?}", e),
        })
    }
}

/// Read every file selected in `input` as text
pub async fn read_selected_files(input: &HtmlInputElement) -> Result<Vec<ImportFile>, String> {
    let files_js = readSelectedFiles(input)
        .await
        .map_err(|e| format!("Failed to read files: {:?}", e))?;

    serde_wasm_bindgen::from_value(files_js).map_err(|e| format!("Failed to parse files: {:?}", e))
}
