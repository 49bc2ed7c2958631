use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub mod bookingdtos;
pub mod categorydtos;
pub mod reviewdtos;
pub mod servicedtos;
pub mod userdtos;

/// Uniform envelope around every response body, success and error alike.
/// `path` is stamped in by middleware once the request URI is known.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
    pub path: Option<String>,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.to_string(),
            data: Some(data),
            timestamp: Utc::now(),
            path: None,
            status_code: 200,
        }
    }

    pub fn created(message: &str, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.to_string(),
            data: Some(data),
            timestamp: Utc::now(),
            path: None,
            status_code: 201,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: &str) -> Self {
        ApiResponse {
            success: true,
            message: message.to_string(),
            data: None,
            timestamp: Utc::now(),
            path: None,
            status_code: 200,
        }
    }

    pub fn error(message: &str, status_code: u16) -> Self {
        ApiResponse {
            success: false,
            message: message.to_string(),
            data: None,
            timestamp: Utc::now(),
            path: None,
            status_code,
        }
    }
}

/// 0-based pagination query params, capped to keep list endpoints bounded.
#[derive(Serialize, Deserialize, Validate, Debug, Default, Clone)]
pub struct RequestQueryDto {
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 50))]
    pub size: Option<u32>,
}

impl RequestQueryDto {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn size(&self) -> u32 {
        self.size.unwrap_or(10)
    }

    pub fn offset(&self) -> i64 {
        self.page() as i64 * self.size() as i64
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: u32,
}

impl<T> PageDto<T> {
    pub fn new(content: Vec<T>, page: u32, size: u32, total_elements: i64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            ((total_elements + size as i64 - 1) / size as i64) as u32
        };

        PageDto {
            content,
            page,
            size,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults() {
        let query = RequestQueryDto::default();
        assert_eq!(query.page(), 0);
        assert_eq!(query.size(), 10);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn offset_is_page_times_size() {
        let query = RequestQueryDto {
            page: Some(3),
            size: Some(20),
        };
        assert_eq!(query.offset(), 60);
    }

    #[test]
    fn oversized_page_size_fails_validation() {
        let query = RequestQueryDto {
            page: Some(0),
            size: Some(51),
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PageDto::new(vec![1, 2, 3], 0, 10, 21);
        assert_eq!(page.total_pages, 3);

        let exact = PageDto::new(vec![1], 0, 10, 20);
        assert_eq!(exact.total_pages, 2);

        let empty: PageDto<i32> = PageDto::new(vec![], 0, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
