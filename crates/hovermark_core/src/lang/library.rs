//! Core-library vocabulary: the `dart:core` / `dart:async` types and functions every snippet may use without
//! declaring them.
//!
//! Each entry records type parameters, supertypes and member signatures as **type text** (e.g. `Iterable<T>`,
//! `bool Function(E element)`), the same representation the symbol collector uses for snippet declarations. The
//! collector seeds the root scope from [`CORE_TYPES`] and [`CORE_FUNCTIONS`] through the same path it uses for
//! host-supplied custom types.
//!
//! ## Notes
//! - This is a curated subset aimed at documentation snippets, not a mirror of the SDK.
//! - Inherited members are not repeated: `List<E>` implements `Iterable<E>` and relies on member lookup walking
//!   supertypes with substitution.
//!
//! ## Examples
//! ```rust
//! use hovermark_core::lang::library;
//!
//! let list = library::type_named("List").unwrap();
//! assert_eq!(list.type_parameters, &["E"]);
//! assert_eq!(list.implements, &["Iterable<E>"]);
//! ```

/// Library a core entry is declared in.
pub const DART_CORE: &str = "dart:core";
/// Library for futures and streams.
pub const DART_ASYNC: &str = "dart:async";

/// How an argument binds to a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Positional,
    OptionalPositional,
    Named,
}

/// A parameter of a core-library callable.
#[derive(Debug, Clone, Copy)]
pub struct LibraryParam {
    pub name: &'static str,
    pub ty: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default_value: Option<&'static str>,
}

/// What kind of member an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Getter,
    Field,
    Operator,
}

/// A member of a core-library type. For methods `ty` is the return type.
#[derive(Debug, Clone, Copy)]
pub struct LibraryMember {
    pub name: &'static str,
    pub kind: MemberKind,
    pub ty: &'static str,
    pub type_parameters: &'static [&'static str],
    pub parameters: &'static [LibraryParam],
    pub description: &'static str,
}

/// A constructor. `name` is `None` for the unnamed constructor.
#[derive(Debug, Clone, Copy)]
pub struct LibraryConstructor {
    pub name: Option<&'static str>,
    pub parameters: &'static [LibraryParam],
    pub description: &'static str,
}

/// A core-library class.
#[derive(Debug, Clone, Copy)]
pub struct LibraryType {
    pub name: &'static str,
    pub library: &'static str,
    pub type_parameters: &'static [&'static str],
    pub extends: Option<&'static str>,
    pub implements: &'static [&'static str],
    pub description: &'static str,
    pub members: &'static [LibraryMember],
    pub static_members: &'static [LibraryMember],
    pub constructors: &'static [LibraryConstructor],
}

/// A top-level core-library function.
#[derive(Debug, Clone, Copy)]
pub struct LibraryFunction {
    pub name: &'static str,
    pub library: &'static str,
    pub return_type: &'static str,
    pub type_parameters: &'static [&'static str],
    pub parameters: &'static [LibraryParam],
    pub description: &'static str,
}

/// Registry of core types.
pub const CORE_TYPES: &[LibraryType] = &[
    ty(
        "Object",
        &[],
        None,
        &[],
        "The base class for all Dart objects except `null`.",
        &[
            getter("hashCode", "int", "The hash code for this object."),
            getter("runtimeType", "Type", "A representation of the runtime type of the object."),
            method("toString", "String", &[], "A string representation of this object."),
            operator("==", "bool", &[pos("other", "Object")], "The equality operator."),
        ],
    ),
    ty("Null", &[], None, &[], "The reserved word `null` denotes an object that is the sole instance of this class.", &[]),
    ty("dynamic", &[], None, &[], "A type that disables static checking.", &[]),
    ty("void", &[], None, &[], "The type of expressions whose value is never used.", &[]),
    ty("Never", &[], None, &[], "The type of expressions that never complete normally.", &[]),
    ty("Type", &[], Some("Object"), &[], "Runtime representation of a type.", &[]),
    ty("Function", &[], Some("Object"), &[], "The base type of all function types.", &[]),
    ty("Record", &[], Some("Object"), &[], "The supertype of all record types.", &[]),
    ty("Pattern", &[], Some("Object"), &[], "An interface for basic searches within strings.", &[]),
    ty(
        "Comparable",
        &["T"],
        Some("Object"),
        &[],
        "Interface used by types that have an intrinsic ordering.",
        &[method("compareTo", "int", &[pos("other", "T")], "Compares this object to another object.")],
    ),
    ty(
        "num",
        &[],
        Some("Object"),
        &["Comparable<num>"],
        "An integer or floating-point number.",
        &[
            getter("isNegative", "bool", "Whether this number is negative."),
            getter("isNaN", "bool", "Whether this number is a Not-a-Number value."),
            method("abs", "num", &[], "The absolute value of this number."),
            method("round", "int", &[], "The integer closest to this number."),
            method("floor", "int", &[], "The greatest integer no greater than this number."),
            method("ceil", "int", &[], "The least integer no smaller than `this`."),
            method("toInt", "int", &[], "Truncates this number to an integer."),
            method("toDouble", "double", &[], "This number as a double."),
            method(
                "toStringAsFixed",
                "String",
                &[pos("fractionDigits", "int")],
                "A decimal-point string-representation of this number.",
            ),
            method(
                "clamp",
                "num",
                &[pos("lowerLimit", "num"), pos("upperLimit", "num")],
                "Returns this number clamped to be in the range `lowerLimit`-`upperLimit`.",
            ),
            operator("+", "num", &[pos("other", "num")], "Adds [other] to this number."),
            operator("-", "num", &[pos("other", "num")], "Subtracts [other] from this number."),
            operator("*", "num", &[pos("other", "num")], "Multiplies this number by [other]."),
            operator("/", "double", &[pos("other", "num")], "Divides this number by [other]."),
            operator("~/", "int", &[pos("other", "num")], "Truncating division operator."),
            operator("%", "num", &[pos("other", "num")], "Euclidean modulo of this number by [other]."),
        ],
    ),
    LibraryType {
        static_members: &[
            static_method(
                "parse",
                "int",
                &[pos("source", "String"), named("radix", "int?", None)],
                "Parse [source] as a, possibly signed, integer literal.",
            ),
            static_method(
                "tryParse",
                "int?",
                &[pos("source", "String"), named("radix", "int?", None)],
                "Parse [source] as a, possibly signed, integer literal, returning `null` on failure.",
            ),
        ],
        ..ty(
            "int",
            &[],
            Some("num"),
            &[],
            "An integer number.",
            &[
                getter("isEven", "bool", "Returns true if and only if this integer is even."),
                getter("isOdd", "bool", "Returns true if and only if this integer is odd."),
                getter("bitLength", "int", "Returns the minimum number of bits required to store this integer."),
                method(
                    "toRadixString",
                    "String",
                    &[pos("radix", "int")],
                    "Converts this integer to a string representation in the given [radix].",
                ),
                method("abs", "int", &[], "Returns the absolute value of this integer."),
            ],
        )
    },
    LibraryType {
        static_members: &[
            static_method("parse", "double", &[pos("source", "String")], "Parse [source] as a double literal."),
            static_method(
                "tryParse",
                "double?",
                &[pos("source", "String")],
                "Parse [source] as a double literal, returning `null` on failure.",
            ),
            static_field("infinity", "double", "Positive infinity."),
            static_field("nan", "double", "A Not-a-Number value."),
        ],
        ..ty(
            "double",
            &[],
            Some("num"),
            &[],
            "A double-precision floating point number.",
            &[
                method("abs", "double", &[], "The absolute value of this number."),
                method("truncateToDouble", "double", &[], "Returns the integer double value obtained by discarding any fractional digits."),
            ],
        )
    },
    ty(
        "bool",
        &[],
        Some("Object"),
        &[],
        "The reserved words `true` and `false` denote objects that are the only two instances of this class.",
        &[
            operator("&", "bool", &[pos("other", "bool")], "The logical conjunction (\"and\") of this and [other]."),
            operator("|", "bool", &[pos("other", "bool")], "The logical disjunction (\"inclusive or\") of this and [other]."),
        ],
    ),
    ty(
        "String",
        &[],
        Some("Object"),
        &["Comparable<String>", "Pattern"],
        "A sequence of UTF-16 code units.",
        &[
            getter("length", "int", "The length of the string."),
            getter("isEmpty", "bool", "Whether this string is empty."),
            getter("isNotEmpty", "bool", "Whether this string is not empty."),
            getter("codeUnits", "List<int>", "An unmodifiable list of the UTF-16 code units of this string."),
            method("toUpperCase", "String", &[], "Converts all characters in this string to upper case."),
            method("toLowerCase", "String", &[], "Converts all characters in this string to lower case."),
            method("trim", "String", &[], "The string without any leading and trailing whitespace."),
            method(
                "split",
                "List<String>",
                &[pos("pattern", "Pattern")],
                "Splits the string at matches of [pattern] and returns a list of substrings.",
            ),
            method(
                "contains",
                "bool",
                &[pos("other", "Pattern"), opt("startIndex", "int", Some("0"))],
                "Whether this string contains a match of [other].",
            ),
            method(
                "startsWith",
                "bool",
                &[pos("pattern", "Pattern"), opt("index", "int", Some("0"))],
                "Whether this string starts with a match of [pattern].",
            ),
            method("endsWith", "bool", &[pos("other", "String")], "Whether this string ends with [other]."),
            method(
                "substring",
                "String",
                &[pos("start", "int"), opt("end", "int?", None)],
                "The substring of this string from [start], inclusive, to [end], exclusive.",
            ),
            method(
                "replaceAll",
                "String",
                &[pos("from", "Pattern"), pos("replace", "String")],
                "Replaces all substrings that match [from] with [replace].",
            ),
            method(
                "indexOf",
                "int",
                &[pos("pattern", "Pattern"), opt("start", "int", Some("0"))],
                "Returns the position of the first match of [pattern] in this string.",
            ),
            method(
                "padLeft",
                "String",
                &[pos("width", "int"), opt("padding", "String", Some("' '"))],
                "Pads this string on the left if it is shorter than [width].",
            ),
            method(
                "padRight",
                "String",
                &[pos("width", "int"), opt("padding", "String", Some("' '"))],
                "Pads this string on the right if it is shorter than [width].",
            ),
            operator("+", "String", &[pos("other", "String")], "Creates a new string by concatenating this string with [other]."),
            operator("[]", "String", &[pos("index", "int")], "The character (as a single-code-unit String) at the given [index]."),
        ],
    ),
    ty(
        "Iterable",
        &["E"],
        Some("Object"),
        &[],
        "A collection of values, or \"elements\", that can be accessed sequentially.",
        &[
            getter("length", "int", "The number of elements in this Iterable."),
            getter("isEmpty", "bool", "Whether this collection has no elements."),
            getter("isNotEmpty", "bool", "Whether this collection has at least one element."),
            getter("first", "E", "The first element."),
            getter("last", "E", "The last element."),
            getter("single", "E", "Checks that this iterable has only one element, and returns that element."),
            generic_method(
                "map",
                &["T"],
                "Iterable<T>",
                &[pos("toElement", "T Function(E e)")],
                "The current elements of this iterable modified by [toElement].",
            ),
            method(
                "where",
                "Iterable<E>",
                &[pos("test", "bool Function(E element)")],
                "Creates a new lazy Iterable with all elements that satisfy the predicate [test].",
            ),
            generic_method(
                "whereType",
                &["T"],
                "Iterable<T>",
                &[],
                "Creates a new lazy Iterable with all elements that have type `T`.",
            ),
            generic_method(
                "expand",
                &["T"],
                "Iterable<T>",
                &[pos("toElements", "Iterable<T> Function(E element)")],
                "Expands each element of this Iterable into zero or more elements.",
            ),
            method(
                "forEach",
                "void",
                &[pos("action", "void Function(E element)")],
                "Invokes [action] on each element of this iterable in iteration order.",
            ),
            method(
                "contains",
                "bool",
                &[pos("element", "Object?")],
                "Whether the collection contains an element equal to [element].",
            ),
            method(
                "reduce",
                "E",
                &[pos("combine", "E Function(E value, E element)")],
                "Reduces a collection to a single value by iteratively combining elements of the collection using the provided function.",
            ),
            generic_method(
                "fold",
                &["T"],
                "T",
                &[pos("initialValue", "T"), pos("combine", "T Function(T previousValue, E element)")],
                "Reduces a collection to a single value by iteratively combining each element of the collection with an existing value.",
            ),
            method(
                "every",
                "bool",
                &[pos("test", "bool Function(E element)")],
                "Checks whether every element of this iterable satisfies [test].",
            ),
            method(
                "any",
                "bool",
                &[pos("test", "bool Function(E element)")],
                "Checks whether any element of this iterable satisfies [test].",
            ),
            method(
                "join",
                "String",
                &[opt("separator", "String", Some("\"\""))],
                "Converts each element to a [String] and concatenates the strings.",
            ),
            method(
                "toList",
                "List<E>",
                &[named("growable", "bool", Some("true"))],
                "Creates a [List] containing the elements of this [Iterable].",
            ),
            method("toSet", "Set<E>", &[], "Creates a [Set] containing the same elements as this iterable."),
            method("take", "Iterable<E>", &[pos("count", "int")], "Creates a lazy iterable of the [count] first elements of this iterable."),
            method("skip", "Iterable<E>", &[pos("count", "int")], "Creates an [Iterable] that provides all but the first [count] elements."),
            method(
                "firstWhere",
                "E",
                &[pos("test", "bool Function(E element)"), named("orElse", "E Function()?", None)],
                "The first element that satisfies the given predicate [test].",
            ),
            method("elementAt", "E", &[pos("index", "int")], "Returns the [index]th element."),
        ],
    ),
    LibraryType {
        constructors: &[
            ctor(
                Some("filled"),
                &[pos("length", "int"), pos("fill", "E"), named("growable", "bool", Some("false"))],
                "Creates a list of the given length with [fill] at each position.",
            ),
            ctor(
                Some("generate"),
                &[
                    pos("length", "int"),
                    pos("generator", "E Function(int index)"),
                    named("growable", "bool", Some("true")),
                ],
                "Generates a list of values.",
            ),
            ctor(Some("empty"), &[named("growable", "bool", Some("false"))], "Creates a new empty list."),
            ctor(
                Some("from"),
                &[pos("elements", "Iterable<dynamic>"), named("growable", "bool", Some("true"))],
                "Creates a list containing all [elements].",
            ),
            ctor(
                Some("of"),
                &[pos("elements", "Iterable<E>"), named("growable", "bool", Some("true"))],
                "Creates a list from [elements].",
            ),
        ],
        ..ty(
            "List",
            &["E"],
            Some("Object"),
            &["Iterable<E>"],
            "An indexable collection of objects with a length.",
            &[
                getter("reversed", "Iterable<E>", "An [Iterable] of the objects in this list in reverse order."),
                method("add", "void", &[pos("value", "E")], "Adds [value] to the end of this list, extending the length by one."),
                method(
                    "addAll",
                    "void",
                    &[pos("iterable", "Iterable<E>")],
                    "Appends all objects of [iterable] to the end of this list.",
                ),
                method(
                    "insert",
                    "void",
                    &[pos("index", "int"), pos("element", "E")],
                    "Inserts [element] at position [index] in this list.",
                ),
                method(
                    "remove",
                    "bool",
                    &[pos("value", "Object?")],
                    "Removes the first occurrence of [value] from this list.",
                ),
                method("removeAt", "E", &[pos("index", "int")], "Removes the object at position [index] from this list."),
                method("removeLast", "E", &[], "Removes and returns the last object in this list."),
                method(
                    "removeWhere",
                    "void",
                    &[pos("test", "bool Function(E element)")],
                    "Removes all objects from this list that satisfy [test].",
                ),
                method("clear", "void", &[], "Removes all objects from this list; the length of the list becomes zero."),
                method(
                    "indexOf",
                    "int",
                    &[pos("element", "E"), opt("start", "int", Some("0"))],
                    "The first index of [element] in this list.",
                ),
                method(
                    "sort",
                    "void",
                    &[opt("compare", "int Function(E a, E b)?", None)],
                    "Sorts this list according to the order specified by the [compare] function.",
                ),
                method(
                    "sublist",
                    "List<E>",
                    &[pos("start", "int"), opt("end", "int?", None)],
                    "Returns a new list containing the elements between [start] and [end].",
                ),
                method("asMap", "Map<int, E>", &[], "An unmodifiable [Map] view of this list."),
                operator("[]", "E", &[pos("index", "int")], "The object at the given [index] in the list."),
                operator("+", "List<E>", &[pos("other", "List<E>")], "Returns the concatenation of this list and [other]."),
            ],
        )
    },
    LibraryType {
        constructors: &[
            ctor(None, &[], "Creates an empty [Set]."),
            ctor(Some("of"), &[pos("elements", "Iterable<E>")], "Creates a [Set] from [elements]."),
        ],
        ..ty(
            "Set",
            &["E"],
            Some("Object"),
            &["Iterable<E>"],
            "A collection of objects in which each object can occur only once.",
            &[
                method("add", "bool", &[pos("value", "E")], "Adds [value] to the set."),
                method("addAll", "void", &[pos("elements", "Iterable<E>")], "Adds all [elements] to this set."),
                method("remove", "bool", &[pos("value", "Object?")], "Removes [value] from the set."),
                method("union", "Set<E>", &[pos("other", "Set<E>")], "Creates a new set which contains all the elements of this set and [other]."),
                method(
                    "intersection",
                    "Set<E>",
                    &[pos("other", "Set<Object?>")],
                    "Creates a new set which is the intersection between this set and [other].",
                ),
                method(
                    "difference",
                    "Set<E>",
                    &[pos("other", "Set<Object?>")],
                    "Creates a new set with the elements of this that are not in [other].",
                ),
            ],
        )
    },
    LibraryType {
        constructors: &[
            ctor(None, &[], "Creates an empty [LinkedHashMap]."),
            ctor(Some("of"), &[pos("other", "Map<K, V>")], "Creates a [LinkedHashMap] with the same keys and values as [other]."),
            ctor(
                Some("fromEntries"),
                &[pos("entries", "Iterable<MapEntry<K, V>>")],
                "Creates a new map and adds all entries.",
            ),
        ],
        ..ty(
            "Map",
            &["K", "V"],
            Some("Object"),
            &[],
            "A collection of key/value pairs, from which you retrieve a value using its associated key.",
            &[
                getter("length", "int", "The number of key/value pairs in the map."),
                getter("isEmpty", "bool", "Whether there is no key/value pair in the map."),
                getter("isNotEmpty", "bool", "Whether there is at least one key/value pair in the map."),
                getter("keys", "Iterable<K>", "The keys of this [Map]."),
                getter("values", "Iterable<V>", "The values of this [Map]."),
                getter("entries", "Iterable<MapEntry<K, V>>", "The map entries of this [Map]."),
                method("containsKey", "bool", &[pos("key", "Object?")], "Whether this map contains the given [key]."),
                method("containsValue", "bool", &[pos("value", "Object?")], "Whether this map contains the given [value]."),
                method(
                    "putIfAbsent",
                    "V",
                    &[pos("key", "K"), pos("ifAbsent", "V Function()")],
                    "Look up the value of [key], or add a new entry if it isn't there.",
                ),
                method("remove", "V?", &[pos("key", "Object?")], "Removes [key] and its associated value, if present, from the map."),
                method("addAll", "void", &[pos("other", "Map<K, V>")], "Adds all key/value pairs of [other] to this map."),
                method(
                    "forEach",
                    "void",
                    &[pos("action", "void Function(K key, V value)")],
                    "Applies [action] to each key/value pair of the map.",
                ),
                generic_method(
                    "map",
                    &["K2", "V2"],
                    "Map<K2, V2>",
                    &[pos("convert", "MapEntry<K2, V2> Function(K key, V value)")],
                    "Returns a new map where all entries of this map are transformed by the given [convert] function.",
                ),
                method(
                    "update",
                    "V",
                    &[pos("key", "K"), pos("update", "V Function(V value)"), named("ifAbsent", "V Function()?", None)],
                    "Updates the value for the provided [key].",
                ),
                method("clear", "void", &[], "Removes all entries from the map."),
                operator("[]", "V?", &[pos("key", "Object?")], "The value for the given [key], or `null` if [key] is not in the map."),
            ],
        )
    },
    LibraryType {
        constructors: &[ctor(None, &[pos("key", "K"), pos("value", "V")], "Creates an entry with [key] and [value].")],
        ..ty(
            "MapEntry",
            &["K", "V"],
            Some("Object"),
            &[],
            "A key/value pair representing an entry in a [Map].",
            &[
                field("key", "K", "The key of the entry."),
                field("value", "V", "The value associated to [key] in a map."),
            ],
        )
    },
    LibraryType {
        library: DART_ASYNC,
        constructors: &[
            ctor(
                None,
                &[pos("computation", "FutureOr<T> Function()")],
                "Creates a future containing the result of calling [computation] asynchronously.",
            ),
            ctor(
                Some("delayed"),
                &[pos("duration", "Duration"), opt("computation", "FutureOr<T> Function()?", None)],
                "Creates a future that runs its computation after a delay.",
            ),
            ctor(Some("value"), &[opt("value", "FutureOr<T>?", None)], "Creates a future completed with [value]."),
            ctor(Some("error"), &[pos("error", "Object"), opt("stackTrace", "StackTrace?", None)], "Creates a future that completes with an error."),
        ],
        static_members: &[LibraryMember {
            type_parameters: &["T"],
            ..static_method(
                "wait",
                "Future<List<T>>",
                &[pos("futures", "Iterable<Future<T>>"), named("eagerError", "bool", Some("false"))],
                "Waits for multiple futures to complete and collects their results.",
            )
        }],
        ..ty(
            "Future",
            &["T"],
            Some("Object"),
            &[],
            "The result of an asynchronous computation.",
            &[
                generic_method(
                    "then",
                    &["R"],
                    "Future<R>",
                    &[pos("onValue", "FutureOr<R> Function(T value)"), named("onError", "Function?", None)],
                    "Register callbacks to be called when this future completes.",
                ),
                method(
                    "catchError",
                    "Future<T>",
                    &[pos("onError", "Function"), named("test", "bool Function(Object error)?", None)],
                    "Handles errors emitted by this [Future].",
                ),
                method(
                    "whenComplete",
                    "Future<T>",
                    &[pos("action", "FutureOr<void> Function()")],
                    "Registers a function to be called when this future completes.",
                ),
                method(
                    "timeout",
                    "Future<T>",
                    &[pos("timeLimit", "Duration"), named("onTimeout", "FutureOr<T> Function()?", None)],
                    "Stop waiting for this future after [timeLimit] has passed.",
                ),
            ],
        )
    },
    LibraryType {
        library: DART_ASYNC,
        ..ty("FutureOr", &["T"], None, &[], "A type representing values that are either `Future<T>` or `T`.", &[])
    },
    LibraryType {
        library: DART_ASYNC,
        constructors: &[
            ctor(Some("value"), &[pos("value", "T")], "Creates a stream which emits a single data event before closing."),
            ctor(
                Some("fromIterable"),
                &[pos("elements", "Iterable<T>")],
                "Creates a stream that gets its data from [elements].",
            ),
            ctor(
                Some("periodic"),
                &[pos("period", "Duration"), opt("computation", "T Function(int computationCount)?", None)],
                "Creates a stream that repeatedly emits events at [period] intervals.",
            ),
        ],
        ..ty(
            "Stream",
            &["T"],
            Some("Object"),
            &[],
            "A source of asynchronous data events.",
            &[
                getter("first", "Future<T>", "The first element of this stream."),
                getter("length", "Future<int>", "The number of elements in this stream."),
                method(
                    "listen",
                    "StreamSubscription<T>",
                    &[
                        pos("onData", "void Function(T event)?"),
                        named("onError", "Function?", None),
                        named("onDone", "void Function()?", None),
                        named("cancelOnError", "bool?", None),
                    ],
                    "Adds a subscription to this stream.",
                ),
                generic_method(
                    "map",
                    &["S"],
                    "Stream<S>",
                    &[pos("convert", "S Function(T event)")],
                    "Transforms each element of this stream into a new stream event.",
                ),
                method(
                    "where",
                    "Stream<T>",
                    &[pos("test", "bool Function(T event)")],
                    "Creates a new stream from this stream that discards some elements.",
                ),
                method("toList", "Future<List<T>>", &[], "Collects all elements of this stream in a [List]."),
                method(
                    "forEach",
                    "Future<void>",
                    &[pos("action", "void Function(T element)")],
                    "Executes [action] on each element of this stream.",
                ),
            ],
        )
    },
    LibraryType {
        library: DART_ASYNC,
        ..ty(
            "StreamSubscription",
            &["T"],
            Some("Object"),
            &[],
            "A subscription on events from a [Stream].",
            &[
                method("cancel", "Future<void>", &[], "Cancels this subscription."),
                method("pause", "void", &[opt("resumeSignal", "Future<void>?", None)], "Requests that the stream pauses events until further notice."),
                method("resume", "void", &[], "Resumes after a pause."),
            ],
        )
    },
    LibraryType {
        constructors: &[ctor(
            None,
            &[
                named("days", "int", Some("0")),
                named("hours", "int", Some("0")),
                named("minutes", "int", Some("0")),
                named("seconds", "int", Some("0")),
                named("milliseconds", "int", Some("0")),
                named("microseconds", "int", Some("0")),
            ],
            "Creates a new [Duration] object whose value is the sum of all individual parts.",
        )],
        static_members: &[static_field("zero", "Duration", "An empty duration, representing zero time.")],
        ..ty(
            "Duration",
            &[],
            Some("Object"),
            &["Comparable<Duration>"],
            "A span of time, such as 27 days, 4 hours, 12 minutes, and 3 seconds.",
            &[
                getter("inDays", "int", "The number of entire days spanned by this [Duration]."),
                getter("inHours", "int", "The number of entire hours spanned by this [Duration]."),
                getter("inMinutes", "int", "The number of whole minutes spanned by this [Duration]."),
                getter("inSeconds", "int", "The number of whole seconds spanned by this [Duration]."),
                getter("inMilliseconds", "int", "The number of whole milliseconds spanned by this [Duration]."),
                getter("inMicroseconds", "int", "The number of whole microseconds spanned by this [Duration]."),
                getter("isNegative", "bool", "Whether this [Duration] is negative."),
                method("abs", "Duration", &[], "Creates a new [Duration] representing the absolute length of this [Duration]."),
                operator("+", "Duration", &[pos("other", "Duration")], "Adds this Duration and [other] and returns the sum as a new Duration object."),
            ],
        )
    },
    LibraryType {
        constructors: &[
            ctor(
                None,
                &[
                    pos("year", "int"),
                    opt("month", "int", Some("1")),
                    opt("day", "int", Some("1")),
                    opt("hour", "int", Some("0")),
                    opt("minute", "int", Some("0")),
                    opt("second", "int", Some("0")),
                ],
                "Constructs a [DateTime] instance specified in the local time zone.",
            ),
            ctor(Some("now"), &[], "Constructs a [DateTime] instance with current date and time in the local time zone."),
            ctor(
                Some("utc"),
                &[
                    pos("year", "int"),
                    opt("month", "int", Some("1")),
                    opt("day", "int", Some("1")),
                    opt("hour", "int", Some("0")),
                    opt("minute", "int", Some("0")),
                    opt("second", "int", Some("0")),
                ],
                "Constructs a [DateTime] instance specified in the UTC time zone.",
            ),
        ],
        static_members: &[
            static_method(
                "parse",
                "DateTime",
                &[pos("formattedString", "String")],
                "Constructs a new [DateTime] instance based on [formattedString].",
            ),
            static_method(
                "tryParse",
                "DateTime?",
                &[pos("formattedString", "String")],
                "Constructs a new [DateTime] instance based on [formattedString], or `null` if it is not valid.",
            ),
        ],
        ..ty(
            "DateTime",
            &[],
            Some("Object"),
            &["Comparable<DateTime>"],
            "An instant in time, such as July 20, 1969, 8:18pm GMT.",
            &[
                getter("year", "int", "The year."),
                getter("month", "int", "The month `[1..12]`."),
                getter("day", "int", "The day of the month `[1..31]`."),
                getter("hour", "int", "The hour of the day, expressed as in a 24-hour clock `[0..23]`."),
                getter("minute", "int", "The minute `[0...59]`."),
                getter("second", "int", "The second `[0...59]`."),
                getter("weekday", "int", "The day of the week `monday`..`sunday`."),
                getter("millisecondsSinceEpoch", "int", "The number of milliseconds since the \"Unix epoch\"."),
                getter("isUtc", "bool", "True if this [DateTime] is set to UTC time."),
                method("add", "DateTime", &[pos("duration", "Duration")], "Returns a new [DateTime] instance with [duration] added to this."),
                method(
                    "subtract",
                    "DateTime",
                    &[pos("duration", "Duration")],
                    "Returns a new [DateTime] instance with [duration] subtracted from this.",
                ),
                method(
                    "difference",
                    "Duration",
                    &[pos("other", "DateTime")],
                    "Returns a [Duration] with the difference when subtracting [other] from this.",
                ),
                method("isBefore", "bool", &[pos("other", "DateTime")], "Whether this is before [other]."),
                method("isAfter", "bool", &[pos("other", "DateTime")], "Whether this is after [other]."),
                method("toIso8601String", "String", &[], "Returns an ISO-8601 full-precision extended format representation."),
                method("toUtc", "DateTime", &[], "Returns this DateTime value in the UTC time zone."),
                method("toLocal", "DateTime", &[], "Returns this DateTime value in the local time zone."),
            ],
        )
    },
    LibraryType {
        constructors: &[ctor(None, &[opt("content", "Object", Some("\"\""))], "Creates a string buffer containing the provided [content].")],
        ..ty(
            "StringBuffer",
            &[],
            Some("Object"),
            &[],
            "A class for concatenating strings efficiently.",
            &[
                getter("length", "int", "Returns the length of the content that has been accumulated so far."),
                getter("isEmpty", "bool", "Returns whether the buffer is empty."),
                method("write", "void", &[pos("object", "Object?")], "Converts [object] to a string and adds it to the buffer."),
                method(
                    "writeln",
                    "void",
                    &[opt("obj", "Object?", Some("\"\""))],
                    "Converts [obj] to a String and adds it to the buffer, followed by a newline.",
                ),
                method(
                    "writeAll",
                    "void",
                    &[pos("objects", "Iterable<dynamic>"), opt("separator", "String", Some("\"\""))],
                    "Iterates over the given [objects] and writes them in sequence.",
                ),
                method("clear", "void", &[], "Clears the string buffer."),
            ],
        )
    },
];

/// Registry of top-level core functions.
pub const CORE_FUNCTIONS: &[LibraryFunction] = &[
    LibraryFunction {
        name: "print",
        library: DART_CORE,
        return_type: "void",
        type_parameters: &[],
        parameters: &[pos("object", "Object?")],
        description: "Prints a string representation of the object to the console.",
    },
    LibraryFunction {
        name: "identical",
        library: DART_CORE,
        return_type: "bool",
        type_parameters: &[],
        parameters: &[pos("a", "Object?"), pos("b", "Object?")],
        description: "Check whether two references are to the same object.",
    },
];

/// Look up a core type by name.
pub fn type_named(name: &str) -> Option<&'static LibraryType> {
    CORE_TYPES.iter().find(|t| t.name == name)
}

/// Look up a core function by name.
pub fn function_named(name: &str) -> Option<&'static LibraryFunction> {
    CORE_FUNCTIONS.iter().find(|f| f.name == name)
}

// --- helpers -----------------------------------------------------------------

const fn ty(
    name: &'static str,
    type_parameters: &'static [&'static str],
    extends: Option<&'static str>,
    implements: &'static [&'static str],
    description: &'static str,
    members: &'static [LibraryMember],
) -> LibraryType {
    LibraryType {
        name,
        library: DART_CORE,
        type_parameters,
        extends,
        implements,
        description,
        members,
        static_members: &[],
        constructors: &[],
    }
}

const fn member(
    name: &'static str,
    kind: MemberKind,
    ty: &'static str,
    parameters: &'static [LibraryParam],
    description: &'static str,
) -> LibraryMember {
    LibraryMember {
        name,
        kind,
        ty,
        type_parameters: &[],
        parameters,
        description,
    }
}

const fn method(
    name: &'static str,
    ty: &'static str,
    parameters: &'static [LibraryParam],
    description: &'static str,
) -> LibraryMember {
    member(name, MemberKind::Method, ty, parameters, description)
}

const fn generic_method(
    name: &'static str,
    type_parameters: &'static [&'static str],
    ty: &'static str,
    parameters: &'static [LibraryParam],
    description: &'static str,
) -> LibraryMember {
    LibraryMember {
        type_parameters,
        ..method(name, ty, parameters, description)
    }
}

const fn operator(
    name: &'static str,
    ty: &'static str,
    parameters: &'static [LibraryParam],
    description: &'static str,
) -> LibraryMember {
    member(name, MemberKind::Operator, ty, parameters, description)
}

const fn getter(name: &'static str, ty: &'static str, description: &'static str) -> LibraryMember {
    member(name, MemberKind::Getter, ty, &[], description)
}

const fn field(name: &'static str, ty: &'static str, description: &'static str) -> LibraryMember {
    member(name, MemberKind::Field, ty, &[], description)
}

// Static members share the member shape; the registry keeps them in `static_members`.
const fn static_method(
    name: &'static str,
    ty: &'static str,
    parameters: &'static [LibraryParam],
    description: &'static str,
) -> LibraryMember {
    method(name, ty, parameters, description)
}

const fn static_field(name: &'static str, ty: &'static str, description: &'static str) -> LibraryMember {
    field(name, ty, description)
}

const fn ctor(
    name: Option<&'static str>,
    parameters: &'static [LibraryParam],
    description: &'static str,
) -> LibraryConstructor {
    LibraryConstructor {
        name,
        parameters,
        description,
    }
}

const fn pos(name: &'static str, ty: &'static str) -> LibraryParam {
    LibraryParam {
        name,
        ty,
        kind: ParamKind::Positional,
        required: true,
        default_value: None,
    }
}

const fn opt(name: &'static str, ty: &'static str, default_value: Option<&'static str>) -> LibraryParam {
    LibraryParam {
        name,
        ty,
        kind: ParamKind::OptionalPositional,
        required: false,
        default_value,
    }
}

const fn named(name: &'static str, ty: &'static str, default_value: Option<&'static str>) -> LibraryParam {
    LibraryParam {
        name,
        ty,
        kind: ParamKind::Named,
        required: false,
        default_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_reach_iterable() {
        for name in ["List", "Set"] {
            let t = type_named(name).unwrap();
            assert_eq!(t.implements, &["Iterable<E>"], "{name}");
        }
        assert!(type_named("Iterable").unwrap().members.iter().any(|m| m.name == "map"));
    }

    #[test]
    fn test_async_types_live_in_dart_async() {
        assert_eq!(type_named("Future").unwrap().library, DART_ASYNC);
        assert_eq!(type_named("String").unwrap().library, DART_CORE);
    }

    #[test]
    fn test_print_is_a_core_function() {
        let print = function_named("print").unwrap();
        assert_eq!(print.return_type, "void");
        assert_eq!(print.parameters.len(), 1);
    }
}
