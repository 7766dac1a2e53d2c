//! Names the host environment always provides

use std::collections::BTreeSet;

/// Browser and Node.js globals that never need a declaration
pub const AMBIENT_NAMES: &[&str] = &[
    // Language
    "undefined",
    "NaN",
    "Infinity",
    "globalThis",
    "arguments",
    "Object",
    "Function",
    "Array",
    "String",
    "Number",
    "Boolean",
    "Symbol",
    "BigInt",
    "Math",
    "JSON",
    "Date",
    "RegExp",
    "Error",
    "TypeError",
    "RangeError",
    "SyntaxError",
    "ReferenceError",
    "EvalError",
    "URIError",
    "AggregateError",
    "Promise",
    "Map",
    "Set",
    "WeakMap",
    "WeakSet",
    "WeakRef",
    "Proxy",
    "Reflect",
    "Intl",
    "ArrayBuffer",
    "SharedArrayBuffer",
    "DataView",
    "Int8Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "Int16Array",
    "Uint16Array",
    "Int32Array",
    "Uint32Array",
    "Float32Array",
    "Float64Array",
    "BigInt64Array",
    "BigUint64Array",
    "parseInt",
    "parseFloat",
    "isNaN",
    "isFinite",
    "encodeURI",
    "encodeURIComponent",
    "decodeURI",
    "decodeURIComponent",
    "eval",
    // Host
    "console",
    "window",
    "self",
    "document",
    "navigator",
    "location",
    "history",
    "localStorage",
    "sessionStorage",
    "fetch",
    "alert",
    "confirm",
    "prompt",
    "setTimeout",
    "clearTimeout",
    "setInterval",
    "clearInterval",
    "requestAnimationFrame",
    "cancelAnimationFrame",
    "queueMicrotask",
    "structuredClone",
    "performance",
    "crypto",
    "URL",
    "URLSearchParams",
    "TextEncoder",
    "TextDecoder",
    "AbortController",
    "Event",
    "CustomEvent",
    "EventTarget",
    "HTMLElement",
    "Element",
    "Node",
    "Blob",
    "File",
    "FormData",
    "Headers",
    "Request",
    "Response",
    "WebSocket",
    "Worker",
    // Node.js
    "require",
    "module",
    "exports",
    "process",
    "Buffer",
    "global",
    "__dirname",
    "__filename",
];

pub fn ambient_names() -> BTreeSet<&'static str> {
    AMBIENT_NAMES.iter().copied().collect()
}
