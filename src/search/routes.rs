//! Static navigation routes

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub label: &'static str,
    pub path: &'static str,
}

pub const ROUTES: &[Route] = &[
    Route {
        label: "Home",
        path: "/",
    },
    Route {
        label: "About",
        path: "/about",
    },
    Route {
        label: "Experience",
        path: "/experience",
    },
    Route {
        label: "Blog",
        path: "/blog",
    },
    Route {
        label: "Projects",
        path: "/projects",
    },
    Route {
        label: "Contact",
        path: "/contact",
    },
];
