//! # Premium Core
//!
//! 금 프리미엄 서비스의 핵심 도메인 타입과 계산 로직을 제공합니다.
//!
//! - 시세/환율 도메인 타입
//! - 프리미엄 계산기 (순수 함수)
//! - 에러 분류 체계
//! - 설정 관리
//! - 로깅 초기화

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
