#![forbid(unsafe_code)]

/// Name of the runtime helper copy bindings are lowered to.
pub const DEEPCOPY_FN: &str = "__ssdeepcopy";

/// JavaScript source of the deep-copy helper.
///
/// Objects and arrays are copied recursively, shared and cyclic references
/// are copied once, prototypes are kept, and user functions are re-created
/// from their source. Native functions and primitives pass through.
pub const DEEPCOPY_PRELUDE: &str = r#"function __ssdeepcopy(obj, refs = []) {
    if (typeof obj === 'function') {
        const source = String(obj);
        if (/\{\s*\[native code\]\s*\}\s*$/.test(source)) {
            return obj;
        }
        return new Function('return ' + source)();
    }
    if (obj === null || typeof obj !== 'object') {
        return obj;
    }
    for (const [seen, copy] of refs) {
        if (seen === obj) {
            return copy;
        }
    }
    if (Array.isArray(obj)) {
        const result = [];
        refs.push([obj, result]);
        for (const item of obj) {
            result.push(__ssdeepcopy(item, refs));
        }
        return result;
    }
    const result = Object.create(Object.getPrototypeOf(obj));
    refs.push([obj, result]);
    for (const key of Object.keys(obj)) {
        result[key] = __ssdeepcopy(obj[key], refs);
    }
    return result;
}
"#;
