//! Seed records every session starts from

use chrono::{DateTime, Duration, Utc};
use opsdeck_types::*;

pub fn initial_users(now: DateTime<Utc>) -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Admin User".to_string(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            last_login: now - Duration::hours(1),
        },
        User {
            id: 2,
            name: "Operator Jane".to_string(),
            role: UserRole::Operator,
            status: UserStatus::Active,
            last_login: now - Duration::days(1),
        },
        User {
            id: 3,
            name: "Viewer Bob".to_string(),
            role: UserRole::Viewer,
            status: UserStatus::Inactive,
            last_login: now - Duration::days(7),
        },
        User {
            id: 4,
            name: "System Analyst".to_string(),
            role: UserRole::Operator,
            status: UserStatus::Active,
            last_login: now - Duration::days(2),
        },
    ]
}

pub fn initial_logs(now: DateTime<Utc>) -> Vec<LogEntry> {
    let entry = |id, secs_ago, level, message: &str| LogEntry {
        id,
        timestamp: now - Duration::seconds(secs_ago),
        level,
        message: message.to_string(),
    };

    vec![
        entry(1, 10, LogLevel::Info, "System startup successful."),
        entry(2, 8, LogLevel::Info, "User Admin User logged in."),
        entry(3, 5, LogLevel::Warn, "High CPU usage detected on server-01."),
        entry(4, 2, LogLevel::Critical, "Failed to connect to database cluster."),
    ]
}

pub fn initial_resources() -> Vec<Resource> {
    let resource = |id: &str, name: &str, kind, status, usage| Resource {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        status,
        usage,
    };

    vec![
        resource("storage-main", "Main Storage Array", ResourceKind::Storage, ResourceStatus::Online, 78),
        resource("api-gateway", "Public API Gateway", ResourceKind::Api, ResourceStatus::Online, 45),
        resource("render-gpu-1", "GPU Render Node 1", ResourceKind::Device, ResourceStatus::Warning, 92),
        resource("auth-service", "Authentication Service", ResourceKind::Service, ResourceStatus::Online, 23),
        resource("backup-storage", "Backup Storage", ResourceKind::Storage, ResourceStatus::Offline, 0),
    ]
}

pub fn initial_tasks() -> Vec<Task> {
    let task = |id, name: &str, progress, status| Task {
        id,
        name: name.to_string(),
        progress,
        status,
    };

    vec![
        task(1, "Database Backup", 85, TaskStatus::InProgress),
        task(2, "Deploy Update v2.5", 30, TaskStatus::InProgress),
        task(3, "System Health Check", 100, TaskStatus::Completed),
        task(4, "Migrate User Data", 55, TaskStatus::InProgress),
    ]
}

pub fn initial_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    vec![
        Notification {
            id: 1,
            message: "Critical alert: Database connection failed.".to_string(),
            level: NotificationLevel::Critical,
            timestamp: now,
        },
        Notification {
            id: 2,
            message: "Storage is reaching capacity (91%).".to_string(),
            level: NotificationLevel::Warning,
            timestamp: now - Duration::hours(1),
        },
        Notification {
            id: 3,
            message: "New user \"Operator Jane\" was added.".to_string(),
            level: NotificationLevel::Success,
            timestamp: now - Duration::days(1),
        },
    ]
}
