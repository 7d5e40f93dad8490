//! In-app notification, device token and push provider subscriber repositories.

pub mod device;
pub mod notification;
pub mod onesignal;
pub mod truepush;

pub use device::DeviceTokenRepository;
pub use notification::{NewNotification, NotificationRepository};
pub use onesignal::OneSignalPlayerRepository;
pub use truepush::TruepushSubscriberRepository;
