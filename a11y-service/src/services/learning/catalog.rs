//! Built-in learning content for the most common findings.

/// One catalogue entry. Text is served verbatim.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub why_it_matters: &'static str,
    pub wcag_guideline: &'static str,
    pub how_to_test_manually: &'static str,
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        key: "image-alt",
        why_it_matters: r#"Images without alternative text are invisible to screen reader users. When a screen reader encounters an image without alt text, it may skip it entirely or read out the filename, which is often meaningless. This creates a barrier for users who rely on assistive technologies to understand the content of your page. Images that convey information, context, or meaning must have descriptive alt text so all users can access that information."#,
        wcag_guideline: r#"WCAG 2.1 Success Criterion 1.1.1 (Level A): Non-text Content

All non-text content that is presented to the user has a text alternative that serves the equivalent purpose, except for decorative images which should use empty alt attributes (alt="").

For informative images: Provide descriptive alt text that conveys the same information or function as the image.
For decorative images: Use alt="" to indicate the image is purely decorative.
For functional images (buttons, links): Alt text should describe the function, not the appearance."#,
        how_to_test_manually: r#"1. **Screen Reader Test**: Use a screen reader (NVDA, JAWS, VoiceOver) to navigate your page. When you encounter an image, the screen reader should announce meaningful alternative text.

2. **Visual Inspection**: Right-click on images and inspect the HTML. Check that:
   - Informative images have descriptive alt attributes (alt="description")
   - Decorative images have empty alt attributes (alt="")
   - Functional images (buttons/links) have alt text describing their function

3. **Browser DevTools**: Use browser DevTools to temporarily remove images and see if the page still makes sense with just the alt text.

4. **Automated Tools**: Use browser extensions like WAVE or axe DevTools to identify images missing alt text.

5. **User Testing**: Ask a screen reader user to navigate your page and provide feedback on image descriptions."#,
    },
    CatalogEntry {
        key: "link-name",
        why_it_matters: r#"Links without accessible names create significant barriers for screen reader users. When a link has no text content or accessible name, screen readers may announce it as "link" or read the URL, which is unhelpful. Users navigating by links (a common screen reader technique) cannot understand where links will take them. This makes navigation confusing and frustrating, potentially preventing users from accessing important content or functionality."#,
        wcag_guideline: r#"WCAG 2.1 Success Criterion 2.4.4 (Level A): Link Purpose (In Context)

The purpose of each link can be determined from the link text alone or from the link text together with its programmatically determined link context.

Links must have accessible names that clearly describe their purpose. The accessible name can come from:
- Visible link text
- aria-label attribute
- aria-labelledby pointing to descriptive text
- alt text for image links

Link text should be descriptive and meaningful out of context."#,
        how_to_test_manually: r#"1. **Screen Reader Test**: Use a screen reader to navigate links on your page. Each link should announce a clear, descriptive name that indicates where it leads.

2. **Link List Navigation**: Most screen readers can list all links on a page. Use this feature (e.g., NVDA: Insert+F7, JAWS: Insert+F7) and verify each link makes sense out of context.

3. **Visual Inspection**: Check that:
   - Links have visible, descriptive text (not just "click here" or "read more")
   - Image links have descriptive alt text
   - Icon-only links have aria-label or aria-labelledby attributes

4. **Keyboard Navigation**: Tab through all links and verify each one has clear, visible text that describes its purpose.

5. **Automated Tools**: Use WAVE or axe DevTools to identify links without accessible names."#,
    },
    CatalogEntry {
        key: "heading-order",
        why_it_matters: r#"Proper heading hierarchy is crucial for screen reader users to understand page structure and navigate efficiently. Screen readers use headings to create a document outline, allowing users to jump between sections. When headings are skipped (e.g., going from h1 to h3) or used out of order, the document structure becomes confusing. Users lose context about where they are in the page hierarchy and may miss important content sections."#,
        wcag_guideline: r#"WCAG 2.1 Success Criterion 1.3.1 (Level A): Info and Relationships

Information, structure, and relationships conveyed through presentation can be programmatically determined or are available in text.

Headings should follow a logical hierarchy:
- h1: Main page title (usually one per page)
- h2: Major section headings
- h3: Subsections under h2
- h4-h6: Further nested subsections

Never skip heading levels (e.g., don't go from h1 to h3). Use headings to structure content, not for visual styling."#,
        how_to_test_manually: r#"1. **Screen Reader Navigation**: Use a screen reader's heading navigation feature (NVDA: H, JAWS: H, VoiceOver: Cmd+Ctrl+H) to move through headings. Verify the order makes logical sense.

2. **Document Outline**: Use browser extensions like "HeadingsMap" or "WAVE" to view the document outline. Check that:
   - There's typically one h1 per page
   - Headings follow a logical hierarchy (h1 → h2 → h3, etc.)
   - No heading levels are skipped

3. **Visual Inspection**: Review your HTML and ensure headings are used for structure, not just styling. Don't use h2 because you want larger text; use CSS for styling.

4. **Automated Tools**: Run WAVE or axe DevTools to identify heading order violations.

5. **User Testing**: Ask a screen reader user to navigate your page using headings and provide feedback on the structure."#,
    },
    CatalogEntry {
        key: "color-contrast",
        why_it_matters: r#"Insufficient color contrast makes text difficult or impossible to read for users with low vision, color blindness, or those viewing screens in bright sunlight. When text doesn't have enough contrast against its background, it becomes illegible, effectively excluding users from accessing your content. This is one of the most common accessibility barriers and affects a significant portion of users."#,
        wcag_guideline: r#"WCAG 2.1 Success Criterion 1.4.3 (Level AA): Contrast (Minimum)

The visual presentation of text and images of text has a contrast ratio of at least 4.5:1 for normal text and 3:1 for large text (18pt or 14pt bold).

For Level AAA: 7:1 for normal text and 4.5:1 for large text.

Contrast ratios are calculated using:
- Relative luminance of text and background colors
- Text size and weight (larger/bolder text has lower requirements)

Note: Decorative text, logos, and inactive UI components are exempt."#,
        how_to_test_manually: r#"1. **Contrast Checker Tools**: Use online tools like WebAIM Contrast Checker or browser extensions like "Colour Contrast Analyser" to test text/background color combinations.

2. **Browser DevTools**:
   - Use Chrome DevTools' "Accessibility" panel to check contrast ratios
   - Inspect elements and view computed contrast ratios
   - Look for warnings about insufficient contrast

3. **Visual Test**:
   - View your page in grayscale (remove color) to see if text is still readable
   - Test in different lighting conditions if possible
   - Zoom to 200% and verify text remains readable

4. **Automated Tools**: Use WAVE, axe DevTools, or Lighthouse to identify contrast issues. These tools will flag specific elements with insufficient contrast.

5. **User Testing**: Ask users with low vision or color blindness to test your site and provide feedback on readability."#,
    },
    CatalogEntry {
        key: "form-label",
        why_it_matters: r#"Form inputs without labels are inaccessible to screen reader users. When a form field lacks an associated label, screen readers cannot announce what information is expected, making forms impossible to complete. Users may encounter fields with no context about what to enter, leading to errors, frustration, and abandonment of forms. Proper labeling is essential for all users, including those using voice input software that relies on labels to identify fields."#,
        wcag_guideline: r#"WCAG 2.1 Success Criterion 1.3.1 (Level A): Info and Relationships
WCAG 2.1 Success Criterion 3.3.2 (Level A): Labels or Instructions
WCAG 2.1 Success Criterion 4.1.2 (Level A): Name, Role, Value

Form inputs must have:
- Visible labels associated with inputs using the <label> element's "for" attribute matching the input's "id"
- Or inputs wrapped in <label> elements
- Or aria-label/aria-labelledby attributes for programmatic labels

Labels should clearly indicate:
- What information is required
- Whether the field is required (marked with * or "required")
- Expected format (e.g., "MM/DD/YYYY" for dates)"#,
        how_to_test_manually: r#"1. **Screen Reader Test**: Use a screen reader to navigate through form fields. Each field should announce its label clearly before you can enter data.

2. **Keyboard Navigation**: Tab through form fields and verify:
   - Each field has a visible label
   - Labels are properly associated with inputs
   - Required fields are clearly marked

3. **Visual Inspection**: Check that:
   - Every input, select, and textarea has a visible label
   - Labels are positioned close to their inputs
   - Required fields are clearly indicated

4. **HTML Inspection**: Verify labels are properly associated:
   - <label for="inputId"> matches <input id="inputId">
   - Or inputs are wrapped in <label> elements
   - Or aria-label/aria-labelledby is used appropriately

5. **Automated Tools**: Use WAVE or axe DevTools to identify form fields without labels.

6. **User Testing**: Ask a screen reader user to complete your form and provide feedback on clarity and ease of use."#,
    },
    CatalogEntry {
        key: "button-name",
        why_it_matters: r#"Buttons without accessible names are unusable for screen reader users. When a button has no text content or accessible name, screen readers may announce it as "button" with no context about its function. Users cannot understand what the button does or when to use it, creating a barrier to completing tasks. This is especially critical for icon-only buttons or buttons with only images."#,
        wcag_guideline: r#"WCAG 2.1 Success Criterion 4.1.2 (Level A): Name, Role, Value

All user interface components (including buttons) must have accessible names that programmatically identify them.

Buttons must have accessible names from:
- Visible button text
- aria-label attribute
- aria-labelledby pointing to descriptive text
- alt text for image buttons
- title attribute (as fallback, but not recommended)

The accessible name should clearly describe the button's function."#,
        how_to_test_manually: r#"1. **Screen Reader Test**: Use a screen reader to navigate buttons. Each button should announce a clear name that describes its function.

2. **Keyboard Navigation**: Tab through interactive elements and verify buttons announce their purpose clearly.

3. **Visual Inspection**: Check that:
   - Buttons have visible text when possible
   - Icon-only buttons have aria-label attributes
   - Image buttons have descriptive alt text

4. **HTML Inspection**: Verify buttons have accessible names through text content, aria-label, or aria-labelledby.

5. **Automated Tools**: Use WAVE or axe DevTools to identify buttons without accessible names.

6. **User Testing**: Ask a screen reader user to interact with your buttons and verify they understand each button's purpose."#,
    },
    CatalogEntry {
        key: "keyboard-access",
        why_it_matters: r#"Keyboard accessibility is essential for users who cannot use a mouse, including those with motor disabilities, repetitive strain injuries, or who prefer keyboard navigation. If interactive elements cannot be reached or activated via keyboard, these users are completely excluded from your website. Keyboard navigation is also the foundation for many assistive technologies, so keyboard inaccessibility creates cascading barriers."#,
        wcag_guideline: r#"WCAG 2.1 Success Criterion 2.1.1 (Level A): Keyboard

All functionality of the content is operable through a keyboard interface without requiring specific timings for individual keystrokes.

All interactive elements must be:
- Reachable via Tab key navigation
- Activatable via Enter or Space key
- Have visible focus indicators
- Not require mouse-specific interactions (hover, drag-and-drop)

Focus order should follow a logical sequence."#,
        how_to_test_manually: r#"1. **Keyboard-Only Navigation**: Unplug your mouse/trackpad and navigate your entire site using only:
   - Tab: Move forward through interactive elements
   - Shift+Tab: Move backward
   - Enter/Space: Activate buttons and links
   - Arrow keys: Navigate within components (menus, sliders, etc.)

2. **Focus Indicators**: As you tab, verify:
   - All interactive elements receive focus
   - Focus indicators are clearly visible
   - Focus order follows a logical sequence

3. **Skip Links**: Check for skip navigation links that allow users to bypass repetitive content.

4. **No Keyboard Traps**: Ensure users can tab away from all components (modals, dropdowns, etc.).

5. **Automated Tools**: Use keyboard navigation testing tools and screen readers to identify keyboard accessibility issues.

6. **User Testing**: Ask users who rely on keyboard navigation to test your site and provide feedback."#,
    },
    CatalogEntry {
        key: "aria-usage",
        why_it_matters: r#"ARIA (Accessible Rich Internet Applications) attributes enhance accessibility when used correctly, but can create barriers when misused. Incorrect ARIA can override native HTML semantics, create confusing announcements for screen readers, or hide content from assistive technologies. Understanding when and how to use ARIA is crucial for creating accessible dynamic content."#,
        wcag_guideline: r#"WCAG 2.1 Success Criterion 4.1.2 (Level A): Name, Role, Value

ARIA should be used to:
- Enhance native HTML semantics when needed
- Provide accessible names and descriptions
- Communicate dynamic state changes
- Create accessible custom components

ARIA best practices:
- Prefer native HTML elements over ARIA when possible
- Don't override native semantics unnecessarily
- Ensure ARIA attributes are valid and properly used
- Test with screen readers to verify ARIA works as intended"#,
        how_to_test_manually: r#"1. **Screen Reader Test**: Use a screen reader to test components with ARIA. Verify:
   - ARIA labels are announced correctly
   - Roles are appropriate and helpful
   - State changes are communicated
   - No redundant or conflicting information

2. **HTML Inspection**: Check that:
   - ARIA attributes are valid (use ARIA Authoring Practices Guide)
   - Native HTML semantics aren't overridden unnecessarily
   - aria-label/aria-labelledby provide clear names
   - aria-describedby adds helpful context when needed

3. **Validation Tools**: Use ARIA validation tools to check for:
   - Invalid ARIA attributes
   - Missing required ARIA properties
   - Conflicting ARIA and native semantics

4. **Automated Tools**: Use axe DevTools to identify ARIA misuse and issues.

5. **User Testing**: Ask screen reader users to test ARIA-enhanced components and provide feedback on clarity and usability."#,
    },
    CatalogEntry {
        key: "focus-visible",
        why_it_matters: r#"Visible focus indicators are essential for keyboard users to understand where they are on the page. Without clear focus indicators, users cannot see which element has keyboard focus, making navigation confusing and error-prone. Many users rely on focus indicators to track their position, especially on complex pages with many interactive elements."#,
        wcag_guideline: r#"WCAG 2.1 Success Criterion 2.4.7 (Level AA): Focus Visible

Any keyboard operable user interface has a mode of operation where the keyboard focus indicator is visible.

Focus indicators must be:
- Clearly visible (sufficient contrast)
- At least 2px thick
- Visible around the entire focused element
- Not obscured by other elements

Common focus styles include outlines, borders, or background color changes."#,
        how_to_test_manually: r#"1. **Keyboard Navigation**: Tab through all interactive elements and verify:
   - Each element shows a clear focus indicator
   - Focus indicators are visible and distinct
   - Focus order follows a logical sequence

2. **Visual Inspection**: Check that:
   - Focus styles aren't removed with CSS (outline: none without replacement)
   - Focus indicators have sufficient contrast
   - Focus indicators are at least 2px thick

3. **Browser Testing**: Test in multiple browsers as focus styles can vary. Ensure custom focus styles work across browsers.

4. **Automated Tools**: Use accessibility testing tools to identify elements missing focus indicators.

5. **User Testing**: Ask keyboard users to navigate your site and verify they can easily track their position using focus indicators."#,
    },
    CatalogEntry {
        key: "language-attribute",
        why_it_matters: r#"The page language attribute helps screen readers pronounce content correctly and allows translation tools to work properly. When the language isn't declared, screen readers may use the wrong pronunciation rules, making content difficult to understand. This is especially important for pages with content in multiple languages."#,
        wcag_guideline: r#"WCAG 2.1 Success Criterion 3.1.1 (Level A): Language of Page

The default human language of each Web page can be programmatically determined.

The <html> element must have a lang attribute indicating the primary language:
- <html lang="en"> for English
- <html lang="es"> for Spanish
- etc.

For content in different languages within a page, use lang attributes on specific elements."#,
        how_to_test_manually: r#"1. **HTML Inspection**: Check that the <html> element has a lang attribute:
   - <html lang="en"> for English content
   - Use appropriate language codes (ISO 639-1)

2. **Screen Reader Test**: Use a screen reader and verify content is pronounced correctly in the declared language.

3. **Multi-language Content**: If your page has content in multiple languages, verify that specific elements have lang attributes for non-default languages.

4. **Automated Tools**: Use WAVE or axe DevTools to identify pages missing the lang attribute.

5. **Browser DevTools**: Inspect the <html> element and verify the lang attribute is present and correct."#,
    },
];

pub fn entry(key: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.key == key)
}
