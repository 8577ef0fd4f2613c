use serde_json::{json, Value};

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn text_content() -> Value {
    json!({ "text/plain": { "schema": { "type": "string" } } })
}

fn mutation_response(key: &str, description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(json!({
            "type": "array",
            "prefixItems": [
                {
                    "type": "object",
                    "properties": { key: { "$ref": "#/components/schemas/Book" } },
                    "required": [key]
                },
                {
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/Book" }
                }
            ]
        }))
    })
}

fn rejected(description: &str, with_not_found: bool) -> Value {
    let mut content = json_content(json!({
        "oneOf": [
            { "$ref": "#/components/schemas/ValidationErrors" },
            { "$ref": "#/components/schemas/DatabaseError" }
        ]
    }));
    if with_not_found {
        content["text/plain"] = text_content()["text/plain"].clone();
    }
    json!({ "description": description, "content": content })
}

fn form_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": json_content(json!({ "$ref": format!("#/components/schemas/{schema}") }))
    })
}

fn text_field(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn numeric_field(description: &str) -> Value {
    json!({
        "oneOf": [{ "type": "integer" }, { "type": "string" }],
        "description": description
    })
}

pub(super) fn fragment() -> Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "Welcome message",
                    "tags": ["Books"],
                    "responses": {
                        "200": { "description": "OK", "content": text_content() }
                    }
                }
            },
            "/get-all-books": {
                "get": {
                    "summary": "List every book",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "All books in storage order",
                            "content": json_content(json!({
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }))
                        },
                        "400": {
                            "description": "Database failure",
                            "content": json_content(json!({ "$ref": "#/components/schemas/DatabaseError" }))
                        }
                    }
                }
            },
            "/create-book": {
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": form_body("BookForm"),
                    "responses": {
                        "200": mutation_response("saved_book", "The saved book and the whole collection"),
                        "400": rejected("Validation or database failure", false)
                    }
                }
            },
            "/edit-book": {
                "post": {
                    "summary": "Overwrite every field of a book",
                    "tags": ["Books"],
                    "requestBody": form_body("EditBookForm"),
                    "responses": {
                        "200": mutation_response("saved_book", "The edited book and the whole collection"),
                        "400": rejected("Validation failure, unknown id, or database failure", true)
                    }
                }
            },
            "/delete-book": {
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "requestBody": form_body("DeleteBookForm"),
                    "responses": {
                        "200": mutation_response("deleted_book", "The deleted book and the remaining collection"),
                        "400": rejected("Validation failure, unknown id, or database failure", true)
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "_id": text_field("Database-assigned identifier"),
                        "title": text_field("Title of the book"),
                        "author": text_field("Author of the book"),
                        "year": { "type": "integer", "description": "Publication year" },
                        "number_pages": { "type": "integer", "description": "Page count" },
                        "cover": text_field("Cover image URL"),
                        "description": text_field("Short description"),
                        "__v": { "type": "integer", "description": "Storage version, absent in listings" }
                    },
                    "required": ["_id", "title", "author", "year", "number_pages", "cover", "description"]
                },
                "BookForm": {
                    "type": "object",
                    "properties": {
                        "title": text_field("Non-empty after trimming"),
                        "author": text_field("Non-empty after trimming"),
                        "year": numeric_field("Integer, may be sent as a string"),
                        "number_pages": numeric_field("Integer, may be sent as a string"),
                        "cover": text_field("Non-empty after trimming"),
                        "description": text_field("Non-empty after trimming")
                    },
                    "required": ["title", "author", "year", "number_pages", "cover", "description"]
                },
                "EditBookForm": {
                    "allOf": [
                        { "$ref": "#/components/schemas/BookForm" },
                        {
                            "type": "object",
                            "properties": { "id": text_field("Identifier of the book to edit") },
                            "required": ["id"]
                        }
                    ]
                },
                "DeleteBookForm": {
                    "type": "object",
                    "properties": { "id": text_field("Identifier of the book to delete") },
                    "required": ["id"]
                }
            }
        }
    })
}
